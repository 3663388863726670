use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Generator returned HTTP {status}: {message}")]
    UpstreamStatusError { status: u16, message: String },

    #[error("Invalid response structure from generator: {message}")]
    MalformedResponseError { message: String },

    #[error("No working model found (tried: {})", .tried.join(", "))]
    NoWorkingModelError { tried: Vec<String> },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Configuration,
    Export,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::ApiError(_) => ErrorCategory::Network,
            CheckError::UpstreamStatusError { .. }
            | CheckError::MalformedResponseError { .. }
            | CheckError::NoWorkingModelError { .. } => ErrorCategory::Upstream,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CheckError::CsvError(_) => ErrorCategory::Export,
            CheckError::IoError(_) | CheckError::InternalError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Export => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// HTTP status reported by the generator, if the failure carried one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CheckError::UpstreamStatusError { status, .. } => Some(*status),
            CheckError::ApiError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckError::ApiError(e) if e.is_timeout())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::ApiError(e) if e.is_timeout() => {
                "The language model did not answer in time".to_string()
            }
            CheckError::ApiError(_) => "Could not reach the language model API".to_string(),
            CheckError::UpstreamStatusError { status, .. } => {
                format!("The language model API rejected the request (HTTP {})", status)
            }
            CheckError::MalformedResponseError { .. } => {
                "The language model API returned an unexpected response".to_string()
            }
            CheckError::NoWorkingModelError { tried } => {
                format!("None of the {} configured models is usable", tried.len())
            }
            CheckError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            CheckError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CheckError::ConfigError { message }
            | CheckError::ConfigValidationError { message, .. } => {
                format!("Configuration problem: {}", message)
            }
            CheckError::CsvError(_) => "Failed to build the CSV export".to_string(),
            CheckError::IoError(_) | CheckError::InternalError { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.upstream_status() {
            Some(401) | Some(400) => {
                return "Check GEMINI_API_KEY; create a new key at https://aistudio.google.com/apikey"
                    .to_string()
            }
            Some(403) => {
                return "Enable the Generative Language API for the project that owns the key"
                    .to_string()
            }
            Some(404) => {
                return "The model is not available for this key; try another GEMINI_MODEL or run probe_models"
                    .to_string()
            }
            Some(429) => {
                return "The key has no remaining quota; wait or use a key with an active quota"
                    .to_string()
            }
            _ => {}
        }

        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and the configured endpoint URL".to_string()
            }
            ErrorCategory::Upstream => {
                "Run probe_models to see which models answer for this key".to_string()
            }
            ErrorCategory::Configuration => {
                "Set the value via flag, environment variable, .env or the --config file"
                    .to_string()
            }
            ErrorCategory::Export => "Retry the export; the session log is unchanged".to_string(),
            ErrorCategory::Internal => "Check the server logs for details".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
