use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Source file not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Could not read {} as xlsx, xls or UTF-8 CSV: {}", .path.display(), .last_error)]
    UnreadableSource { path: PathBuf, last_error: String },

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    Processing { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    SourceNotFound,
    UnparsableFormat,
    Configuration,
    Runtime,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::SourceNotFound { .. } => ErrorCategory::SourceNotFound,
            ConvertError::UnreadableSource { .. }
            | ConvertError::Workbook(_)
            | ConvertError::Csv(_) => ErrorCategory::UnparsableFormat,
            ConvertError::Config { .. } | ConvertError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            ConvertError::Io(_)
            | ConvertError::Serialization(_)
            | ConvertError::Processing { .. } => ErrorCategory::Runtime,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::SourceNotFound => format!("File not found: {}", self.source_hint()),
            ErrorCategory::UnparsableFormat => format!("Conversion failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Runtime => format!("Conversion failed: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> Vec<&'static str> {
        match self.category() {
            ErrorCategory::Configuration => vec![
                "Check the --config file is valid TOML",
                "Every [[columns.rules]] entry needs a non-empty keyword and canonical label",
            ],
            _ => vec![
                "The source file exists and is readable",
                "It is an .xlsx or .xls workbook, or a UTF-8 CSV separated by ';' or ','",
                "It has columns for the ticket number, the question and the answer",
            ],
        }
    }

    fn source_hint(&self) -> String {
        match self {
            ConvertError::SourceNotFound { path } | ConvertError::UnreadableSource { path, .. } => {
                path.display().to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
