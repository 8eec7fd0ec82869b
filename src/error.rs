use serde::Serialize;
use thiserror::Error;

pub type ProfitResult<T> = Result<T, ProfitError>;

/// Message shown when the upload lacks the required columns
pub const SCHEMA_ERROR_MESSAGE: &str =
    "CSV must contain 'Revenue' and 'Cost' columns (case-insensitive).";

#[derive(Error, Debug)]
pub enum ProfitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No columns to parse from file")]
    EmptyFile,

    #[error("Expected {expected} fields on line {line}, found {found}")]
    TooManyFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid number on line {line} in column '{column}': '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Invalid date on line {line}: '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

/// The two failure classes a user can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required columns missing from the upload
    Schema,
    /// Anything else: loading, derivation, rendering, persistence
    Processing,
}

impl ProfitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfitError::MissingColumns(_) => ErrorKind::Schema,
            _ => ErrorKind::Processing,
        }
    }

    /// Message rendered in place of the summary
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Schema => SCHEMA_ERROR_MESSAGE.to_string(),
            ErrorKind::Processing => format!("Error processing file: {}", self),
        }
    }
}
