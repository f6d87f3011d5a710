#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::shodan::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::model::{ApiKey, Query, StudentInfo};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use toml_config::TomlConfig;

pub const DEFAULT_FILTER: &str = "country:\"GT\"";
pub const API_KEY_ENV: &str = "SHODAN_API_KEY";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub filter: Option<String>,
    pub api_key: Option<String>,
    pub max_results: Option<usize>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Fully resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub query: Query,
    pub api_key: ApiKey,
    pub max_results: Option<usize>,
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub student: StudentInfo,
}

impl Settings {
    /// Precedence is flag, then config file, then default. The filter is
    /// checked before the credential is looked up.
    pub fn resolve(
        overrides: Overrides,
        file: Option<&TomlConfig>,
        env_api_key: Option<String>,
        student: StudentInfo,
    ) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();

        let filter = overrides
            .filter
            .or(file.search.filter.clone())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let query = Query::parse(filter)?;

        let api_key = ApiKey::resolve([overrides.api_key, file.api_key(), env_api_key])?;

        let settings = Self {
            query,
            api_key,
            max_results: overrides.max_results.or(file.search.max_results),
            endpoint: overrides
                .endpoint
                .or(file.source.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout_seconds: overrides
                .timeout_seconds
                .or(file.source.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            student,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        if let Some(max_results) = self.max_results {
            validate_positive_number("max_results", max_results, 1)?;
        }
        validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn filter(&self) -> &str {
        self.query.as_str()
    }

    fn max_results(&self) -> Option<usize> {
        self.max_results
    }
}
