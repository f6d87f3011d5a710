use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Shodan API error{}: {message}", status_suffix(.status))]
    RemoteError { status: Option<u16>, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid filter: {message}")]
    ValidationError { message: String },

    #[error("Credential error: {message}")]
    CredentialError { message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Remote,
    Configuration,
    Validation,
    Credential,
    System,
}

impl ReportError {
    /// Whether the error came from talking to the search service, either at
    /// the transport level or as an error payload returned by the service.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::ApiError(_) | Self::RemoteError { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::RemoteError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Remote
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::CredentialError { .. } => ErrorCategory::Credential,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("Invalid filter: {}", message),
            Self::CredentialError { message } => format!("Error: {}", message),
            Self::RemoteError { message, .. } => format!("Shodan search error: {}", message),
            Self::ApiError(e) if e.is_timeout() => {
                "Shodan search error: the request timed out".to_string()
            }
            Self::ApiError(e) => format!("Shodan search error: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Remove the organization clause (org:) from the filter and try again"
            }
            ErrorCategory::Credential => "Pass --api-key or export SHODAN_API_KEY",
            ErrorCategory::Remote => {
                "Check the filter syntax, your API plan and network connectivity"
            }
            ErrorCategory::Configuration => "Review the command-line flags and the config file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// Every fatal error terminates the process with the same status.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
