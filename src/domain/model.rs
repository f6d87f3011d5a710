use crate::utils::error::{ReportError, Result};
use crate::utils::validation::validate_filter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A search filter that has passed the organization-clause policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(filter: impl Into<String>) -> Result<Self> {
        let filter = filter.into();
        validate_filter(&filter)?;
        Ok(Self(filter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One match returned by the host search. Every attribute may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ip_str")]
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub ports: Option<Vec<u16>>,
    #[serde(rename = "data")]
    pub banner: Option<String>,
    pub hostnames: Option<Vec<String>>,
    pub product: Option<String>,
    pub title: Option<String>,
    pub org: Option<String>,
    pub asn: Option<String>,
    pub location: Option<Location>,
    pub timestamp: Option<String>,
}

impl Record {
    /// Product name, falling back to the page title.
    pub fn label(&self) -> Option<&str> {
        self.product
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.title.as_deref().filter(|t| !t.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}

/// Body of one search response page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub matches: Vec<Record>,
}

/// API credential, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// First non-blank candidate wins.
    pub fn resolve<I>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        candidates
            .into_iter()
            .flatten()
            .find(|key| !key.trim().is_empty())
            .map(Self)
            .ok_or_else(|| ReportError::CredentialError {
                message: "no Shodan API key found. Use --api-key or export SHODAN_API_KEY"
                    .to_string(),
            })
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Identification fields echoed verbatim in the summary block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub carnet: String,
    pub name: String,
    pub course: String,
    pub section: String,
}
