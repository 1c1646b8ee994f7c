//! Error types for steamboard-core
//!
//! The period window engine itself cannot fail; these errors cover parsing
//! user-supplied selectors and reading or writing local files.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for steamboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Parse Errors
    // ===================
    #[error("Unknown period code '{code}' (expected one of: today, 1w, 2w, 1m, 3m, 1y, or empty for all time)")]
    InvalidPeriodCode { code: String },

    #[error("Unknown sales type '{value}' (expected gross or net)")]
    InvalidSalesType { value: String },

    #[error("Invalid date '{value}': expected {expected}")]
    InvalidDate {
        value: String,
        expected: &'static str,
    },

    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Local data directory not found")]
    DataDirNotFound,
}

impl CoreError {
    /// Actionable hint shown by the CLI next to the error, if any
    pub fn suggestion(&self) -> Option<String> {
        match self {
            CoreError::InvalidPeriodCode { .. } => {
                Some("Run 'steamboard periods' to list valid codes".to_string())
            }
            CoreError::InvalidDate { .. } => Some("Dates look like 2024-06-10".to_string()),
            CoreError::FileRead { path, .. } => {
                Some(format!("Check permissions: chmod +r {}", path.display()))
            }
            CoreError::FileWrite { path, .. } => Some(format!(
                "Check that {} is writable, or pass --data-dir",
                path.display()
            )),
            CoreError::JsonParse { .. } => {
                Some("Validate JSON syntax with: jq . <file>".to_string())
            }
            CoreError::DataDirNotFound => {
                Some("Pass --data-dir or set STEAMBOARD_DATA_DIR".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_period_message_lists_codes() {
        let err = CoreError::InvalidPeriodCode {
            code: "6m".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'6m'"));
        assert!(msg.contains("1w"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_file_write_suggests_data_dir() {
        let err = CoreError::FileWrite {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::other("boom"),
        };
        assert!(err.to_string().contains("/tmp/x"));
        let hint = err.suggestion().unwrap();
        assert!(hint.contains("/tmp/x"));
        assert!(hint.contains("--data-dir"));
    }

    #[test]
    fn test_sales_type_has_no_suggestion() {
        let err = CoreError::InvalidSalesType {
            value: "both".to_string(),
        };
        assert!(err.suggestion().is_none());
    }
}
