use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unsupported country: {value}")]
    UnsupportedCountry { value: String },

    #[error("Calculation engine unavailable: {message}")]
    EngineUnavailable { message: String },

    #[error("Malformed engine response: {message}")]
    EngineResponseMalformed { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Engine,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::EngineResponseMalformed {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::UnsupportedCountry { .. } => ErrorCategory::Input,
            Self::EngineUnavailable { .. } | Self::EngineResponseMalformed { .. } => {
                ErrorCategory::Engine
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput { .. } | Self::UnsupportedCountry { .. } => ErrorSeverity::High,
            // 引擎暫時無法連線，稍後重試即可
            Self::EngineUnavailable { .. } => ErrorSeverity::Medium,
            Self::EngineResponseMalformed { .. } => ErrorSeverity::High,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於可重試的暫時性錯誤
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::EngineUnavailable { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Check the input ranges shown in --help and try again",
            Self::UnsupportedCountry { .. } => {
                "Choose one of: France, Germany, Italy, Switzerland"
            }
            Self::EngineUnavailable { .. } => {
                "Check network connectivity and the engine endpoint, then retry"
            }
            Self::EngineResponseMalformed { .. } => {
                "The engine returned an unexpected payload; verify the service version"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the engine configuration file and command line flags"
            }
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) => {
                "Check that the output path exists and is writable"
            }
            Self::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => {
                format!("Input '{}' is not valid: {}", field, reason)
            }
            Self::UnsupportedCountry { value } => {
                format!("'{}' is not a supported country", value)
            }
            Self::EngineUnavailable { .. } => {
                "The carbon tax engine could not be reached".to_string()
            }
            Self::EngineResponseMalformed { .. } => {
                "The carbon tax engine returned results that could not be read".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
