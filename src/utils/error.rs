use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Input could not be parsed: {message}")]
    ParseFailure { message: String },

    #[error("Cleaning produced no rows ({rows_read} read, {rows_dropped} dropped)")]
    EmptyResult {
        rows_read: usize,
        rows_dropped: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::ParseFailure { .. }
            | EtlError::EmptyResult { .. } => ErrorCategory::Input,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ParseFailure { .. } | EtlError::CsvError(_) => {
                "The uploaded file is not a readable CSV".to_string()
            }
            EtlError::EmptyResult { .. } => {
                "Resulting dataset is empty or cleaning failed".to_string()
            }
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ParseFailure { .. } | EtlError::CsvError(_) => {
                "Check that the file is UTF-8, comma-delimited and has a header row with the required columns"
            }
            EtlError::EmptyResult { .. } => {
                "Every row was rejected; run with --report to see why each row was dropped"
            }
            EtlError::IoError(_) => "Check that the input exists and the output directory is writable",
            EtlError::SerializationError(_) => "Retry without --report",
            _ => "Fix the configuration value and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
