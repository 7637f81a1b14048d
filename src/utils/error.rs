use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}: {body}")]
    ApiStatusError {
        status: u16,
        url: String,
        body: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Failed to decode document '{document}': {message}")]
    DecodeError { document: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定行程結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl LeaderboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LeaderboardError::ApiError(_) | LeaderboardError::ApiStatusError { .. } => {
                ErrorCategory::Network
            }
            LeaderboardError::ConfigError { .. }
            | LeaderboardError::ConfigValidationError { .. }
            | LeaderboardError::InvalidConfigValueError { .. }
            | LeaderboardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LeaderboardError::CsvError(_)
            | LeaderboardError::SerializationError(_)
            | LeaderboardError::DecodeError { .. } => ErrorCategory::Data,
            LeaderboardError::IoError(_) | LeaderboardError::ZipError(_) => {
                ErrorCategory::Storage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常重試即可
            LeaderboardError::ApiError(_) => ErrorSeverity::Medium,
            LeaderboardError::ApiStatusError { status, .. } if *status >= 500 => {
                ErrorSeverity::Medium
            }
            LeaderboardError::ApiStatusError { .. } => ErrorSeverity::High,
            LeaderboardError::DecodeError { .. } => ErrorSeverity::Medium,
            LeaderboardError::CsvError(_) | LeaderboardError::SerializationError(_) => {
                ErrorSeverity::High
            }
            LeaderboardError::ConfigError { .. }
            | LeaderboardError::ConfigValidationError { .. }
            | LeaderboardError::InvalidConfigValueError { .. }
            | LeaderboardError::MissingConfigError { .. } => ErrorSeverity::High,
            LeaderboardError::IoError(_) | LeaderboardError::ZipError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LeaderboardError::ApiError(_) => {
                "Check network connectivity and the Firestore base URL, then retry".to_string()
            }
            LeaderboardError::ApiStatusError { status, .. } => match status {
                401 | 403 => "Check the API key and the database security rules".to_string(),
                404 => "Check the project id, database name and collection names".to_string(),
                _ => "Retry later; the database service may be unavailable".to_string(),
            },
            LeaderboardError::IoError(_) | LeaderboardError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            LeaderboardError::ConfigError { .. }
            | LeaderboardError::ConfigValidationError { .. } => {
                "Review the configuration file for syntax errors".to_string()
            }
            LeaderboardError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration", field)
            }
            LeaderboardError::MissingConfigError { field } => {
                format!("Set '{}' in the configuration file or via the command line", field)
            }
            LeaderboardError::DecodeError { .. } => {
                "Inspect the offending document in the database console".to_string()
            }
            LeaderboardError::CsvError(_) | LeaderboardError::SerializationError(_) => {
                "Re-run with --verbose and report the failing standings".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not load leaderboard data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Leaderboard data could not be processed: {}", self),
            ErrorCategory::Storage => format!("Could not write leaderboard output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
