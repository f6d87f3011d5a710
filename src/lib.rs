pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::shodan::ShodanClient;
pub use config::{Overrides, Settings};
pub use crate::core::{aggregator::Aggregator, engine::ReportEngine, summary::Summary};
pub use utils::error::{ReportError, Result};
