pub mod aggregator;
pub mod engine;
pub mod summary;

pub use crate::domain::model::{Query, Record, SearchPage};
pub use crate::domain::ports::{ConfigProvider, PageFetcher};
pub use crate::utils::error::Result;
