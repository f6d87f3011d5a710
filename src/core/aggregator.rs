use crate::domain::model::{Query, Record};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;

/// Why the fetch loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The result cap was reached; records were truncated to the cap.
    CapReached,
    /// As many records as the service estimated have been collected.
    TotalReached,
    EmptyPage { page: u32 },
    /// A page after the first could not be fetched. The service uses errors
    /// to signal the end of pagination too, so this is not fatal.
    FetchFailed { page: u32, message: String },
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub records: Vec<Record>,
    pub total_estimate: u64,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

impl Aggregation {
    /// Diagnostic for the error channel when pagination ended on a failed fetch.
    pub fn diagnostic(&self) -> Option<String> {
        match &self.stop_reason {
            StopReason::FetchFailed { page, message } => Some(format!(
                "End of pages or error requesting page {}: {}",
                page, message
            )),
            _ => None,
        }
    }
}

pub struct Aggregator<F: PageFetcher> {
    fetcher: F,
    max_results: Option<usize>,
}

impl<F: PageFetcher> Aggregator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Walks the result pages one request at a time. Only a failure on the
    /// first page is returned as an error.
    pub async fn run(&self, query: &Query) -> Result<Aggregation> {
        tracing::info!("🔎 Searching with filter: {}", query);
        if let Some(cap) = self.max_results {
            tracing::info!("Result cap requested: {}", cap);
        }

        let mut page = 1;
        let first = self.fetcher.fetch_page(query, page).await?;
        let total_estimate = first.total;
        let mut pages_fetched = 1;
        tracing::info!("Total results (estimated by Shodan): {}", total_estimate);
        tracing::debug!("Page {} returned {} records", page, first.matches.len());

        let mut records = first.matches;

        let stop_reason = loop {
            if let Some(cap) = self.max_results {
                if records.len() >= cap {
                    records.truncate(cap);
                    break StopReason::CapReached;
                }
            }

            if records.len() as u64 >= total_estimate {
                break StopReason::TotalReached;
            }

            page += 1;
            let next = match self.fetcher.fetch_page(query, page).await {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!("End of pages or error requesting page {}: {}", page, e);
                    break StopReason::FetchFailed {
                        page,
                        message: e.to_string(),
                    };
                }
            };
            pages_fetched += 1;
            tracing::debug!("Page {} returned {} records", page, next.matches.len());

            if next.matches.is_empty() {
                break StopReason::EmptyPage { page };
            }
            records.extend(next.matches);
        };

        tracing::info!(
            "Collected {} records from {} pages ({:?})",
            records.len(),
            pages_fetched,
            stop_reason
        );

        Ok(Aggregation {
            records,
            total_estimate,
            pages_fetched,
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SearchPage;
    use crate::utils::error::ReportError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serves canned pages and records every page number requested.
    #[derive(Clone, Default)]
    struct MockFetcher {
        total: u64,
        pages: HashMap<u32, usize>,
        failing: Vec<u32>,
        calls: Arc<Mutex<Vec<u32>>>,
    }

    impl MockFetcher {
        fn new(total: u64, page_sizes: &[usize]) -> Self {
            Self {
                total,
                pages: page_sizes
                    .iter()
                    .enumerate()
                    .map(|(i, size)| (i as u32 + 1, *size))
                    .collect(),
                ..Default::default()
            }
        }

        fn failing_on(mut self, page: u32) -> Self {
            self.failing.push(page);
            self
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch_page(&self, _query: &Query, page: u32) -> Result<SearchPage> {
            self.calls.lock().unwrap().push(page);
            if self.failing.contains(&page) {
                return Err(ReportError::RemoteError {
                    status: Some(500),
                    message: format!("page {} unavailable", page),
                });
            }
            let size = self.pages.get(&page).copied().unwrap_or(0);
            let matches = (0..size)
                .map(|i| Record {
                    ip: Some(format!("10.0.{}.{}", page, i)),
                    port: Some(80),
                    ..Default::default()
                })
                .collect();
            Ok(SearchPage {
                total: self.total,
                matches,
            })
        }
    }

    fn query() -> Query {
        Query::parse("country:\"GT\"").unwrap()
    }

    #[tokio::test]
    async fn test_collects_all_pages_until_total() {
        let fetcher = MockFetcher::new(250, &[100, 100, 50]);
        let aggregator = Aggregator::new(fetcher.clone());

        let result = aggregator.run(&query()).await.unwrap();

        assert_eq!(result.records.len(), 250);
        assert_eq!(result.total_estimate, 250);
        assert_eq!(result.pages_fetched, 3);
        assert_eq!(result.stop_reason, StopReason::TotalReached);
        assert_eq!(fetcher.calls(), vec![1, 2, 3]);
        assert_eq!(result.records[0].ip.as_deref(), Some("10.0.1.0"));
        assert_eq!(result.records[100].ip.as_deref(), Some("10.0.2.0"));
        assert_eq!(result.records[249].ip.as_deref(), Some("10.0.3.49"));
        assert!(result.diagnostic().is_none());
    }

    #[tokio::test]
    async fn test_cap_truncates_mid_page() {
        let fetcher = MockFetcher::new(250, &[100, 100, 50]);
        let aggregator = Aggregator::new(fetcher.clone()).with_max_results(Some(120));

        let result = aggregator.run(&query()).await.unwrap();

        assert_eq!(result.records.len(), 120);
        assert_eq!(result.stop_reason, StopReason::CapReached);
        assert_eq!(fetcher.calls(), vec![1, 2]);
        assert_eq!(result.records[119].ip.as_deref(), Some("10.0.2.19"));
    }

    #[tokio::test]
    async fn test_cap_within_first_page_skips_further_fetches() {
        let fetcher = MockFetcher::new(250, &[100, 100, 50]);
        let aggregator = Aggregator::new(fetcher.clone()).with_max_results(Some(5));

        let result = aggregator.run(&query()).await.unwrap();

        assert_eq!(result.records.len(), 5);
        assert_eq!(fetcher.calls(), vec![1]);
    }

    #[tokio::test]
    async fn test_cap_above_total_stops_on_total() {
        let fetcher = MockFetcher::new(150, &[100, 50]);
        let aggregator = Aggregator::new(fetcher.clone()).with_max_results(Some(1000));

        let result = aggregator.run(&query()).await.unwrap();

        assert_eq!(result.records.len(), 150);
        assert_eq!(result.stop_reason, StopReason::TotalReached);
        assert_eq!(fetcher.calls(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_partial_results() {
        let fetcher = MockFetcher::new(250, &[100, 100, 50]).failing_on(2);
        let aggregator = Aggregator::new(fetcher.clone());

        let result = aggregator.run(&query()).await.unwrap();

        assert_eq!(result.records.len(), 100);
        assert_eq!(result.pages_fetched, 1);
        assert_eq!(fetcher.calls(), vec![1, 2]);
        assert!(matches!(
            result.stop_reason,
            StopReason::FetchFailed { page: 2, .. }
        ));
        let diagnostic = result.diagnostic().unwrap();
        assert!(diagnostic.contains("page 2"));
        assert!(diagnostic.contains("page 2 unavailable"));
    }

    #[tokio::test]
    async fn test_first_page_failure_is_fatal() {
        let fetcher = MockFetcher::new(250, &[100, 100, 50]).failing_on(1);
        let aggregator = Aggregator::new(fetcher.clone());

        let err = aggregator.run(&query()).await.unwrap_err();

        assert!(err.is_remote());
        assert_eq!(fetcher.calls(), vec![1]);
    }

    #[tokio::test]
    async fn test_empty_page_stops_even_when_total_is_stale() {
        let fetcher = MockFetcher::new(1000, &[100, 100]);
        let aggregator = Aggregator::new(fetcher.clone());

        let result = aggregator.run(&query()).await.unwrap();

        assert_eq!(result.records.len(), 200);
        assert_eq!(result.stop_reason, StopReason::EmptyPage { page: 3 });
        assert_eq!(fetcher.calls(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_zero_total_fetches_once() {
        let fetcher = MockFetcher::new(0, &[]);
        let aggregator = Aggregator::new(fetcher.clone());

        let result = aggregator.run(&query()).await.unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.stop_reason, StopReason::TotalReached);
        assert_eq!(fetcher.calls(), vec![1]);
    }
}
