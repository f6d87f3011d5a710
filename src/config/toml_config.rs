use crate::utils::error::{ReportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key is optional; command-line flags win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub filter: Option<String>,
    pub max_results: Option<usize>,
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string, expanding `${VAR}` first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// API key from the file, ignoring placeholders that were never expanded.
    pub fn api_key(&self) -> Option<String> {
        self.source
            .api_key
            .clone()
            .filter(|key| !(key.starts_with("${") && key.ends_with('}')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com"
timeout_seconds = 10
api_key = "abc123"

[search]
filter = 'city:"Jalapa" country:"GT"'
max_results = 250
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.source.timeout_seconds, Some(10));
        assert_eq!(config.api_key().as_deref(), Some("abc123"));
        assert_eq!(
            config.search.filter.as_deref(),
            Some("city:\"Jalapa\" country:\"GT\"")
        );
        assert_eq!(config.search.max_results, Some(250));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.source.endpoint.is_none());
        assert!(config.search.filter.is_none());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHODAN_REPORT_TEST_ENDPOINT", "https://test.api.com");

        let toml_content = r#"
[source]
endpoint = "${SHODAN_REPORT_TEST_ENDPOINT}"
api_key = "${SHODAN_REPORT_TEST_UNSET_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.endpoint.as_deref(), Some("https://test.api.com"));
        assert!(config.api_key().is_none());

        std::env::remove_var("SHODAN_REPORT_TEST_ENDPOINT");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[search\nfilter = 1").unwrap_err();
        assert!(matches!(err, ReportError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[search]\nfilter = \"port:22\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.search.filter.as_deref(), Some("port:22"));
    }

    #[test]
    fn test_missing_file() {
        let err = TomlConfig::from_file("/nonexistent/shodan-report.toml").unwrap_err();
        assert!(matches!(err, ReportError::IoError(_)));
    }
}
