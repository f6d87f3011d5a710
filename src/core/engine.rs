use crate::core::aggregator::{Aggregation, Aggregator};
use crate::core::summary::Summary;
use crate::domain::model::Query;
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;

/// Everything the report stage needs from one run.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub query: Query,
    pub aggregation: Aggregation,
    pub summary: Summary,
}

pub struct ReportEngine<F: PageFetcher> {
    aggregator: Aggregator<F>,
}

impl<F: PageFetcher> ReportEngine<F> {
    pub fn new(fetcher: F, max_results: Option<usize>) -> Self {
        Self {
            aggregator: Aggregator::new(fetcher).with_max_results(max_results),
        }
    }

    /// Aggregate, then reduce. Taking a `Query` means the filter policy has
    /// already been enforced before any request goes out.
    pub async fn run(&self, query: &Query) -> Result<SearchReport> {
        tracing::debug!("Aggregating search results...");
        let aggregation = self.aggregator.run(query).await?;

        tracing::debug!("Summarizing {} records...", aggregation.records.len());
        let summary = Summary::from_records(&aggregation.records);
        tracing::info!(
            "✅ {} unique addresses across {} distinct ports",
            summary.unique_address_count(),
            summary.ranked_ports().len()
        );

        Ok(SearchReport {
            query: query.clone(),
            aggregation,
            summary,
        })
    }
}
