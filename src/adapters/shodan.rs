use crate::domain::model::{ApiKey, Query, SearchPage};
use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.shodan.io";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const SEARCH_PATH: &str = "/shodan/host/search";

/// `PageFetcher` backed by the Shodan REST host search.
pub struct ShodanClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl ShodanClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, api_key: ApiKey) -> Self {
        Self::new(config.api_endpoint(), api_key)
            .with_timeout(Duration::from_secs(config.timeout_seconds()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PATH)
    }
}

#[async_trait]
impl PageFetcher for ShodanClient {
    async fn fetch_page(&self, query: &Query, page: u32) -> Result<SearchPage> {
        let url = self.search_url();
        tracing::debug!("📡 Requesting page {} from {}", page, url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.expose()), ("query", query.as_str())])
            .query(&[("page", page)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) if !status.is_success() => {
                tracing::debug!("Undecodable error body: {}", e);
                return Err(ReportError::RemoteError {
                    status: Some(status.as_u16()),
                    message: status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        // Errors come back as {"error": "..."}, sometimes with a 2xx status.
        if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
            return Err(ReportError::RemoteError {
                status: (!status.is_success()).then(|| status.as_u16()),
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ReportError::RemoteError {
                status: Some(status.as_u16()),
                message: format!("API request failed with status: {}", status),
            });
        }

        Ok(serde_json::from_value(body)?)
    }
}
