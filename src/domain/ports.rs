use crate::domain::model::{Query, SearchPage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Fetches one page of search results. Pages are 1-based and sized by the
/// service.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, query: &Query, page: u32) -> Result<SearchPage>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn filter(&self) -> &str;
    fn max_results(&self) -> Option<usize>;
}
