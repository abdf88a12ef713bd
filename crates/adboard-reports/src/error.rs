use thiserror::Error;

use crate::types::ValidationError;

/// Structural failure while reading a CSV document. Aborts the whole import.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("Invalid numeric value in column {column} (row {row}): '{value}'")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("entry line is empty")]
    EmptyEntry,

    #[error("entry must hold exactly one record, found {0}")]
    MultipleEntries(usize),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of a rejected import: either a single structural error, or the
/// complete list of semantic violations. The two are mutually exclusive.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{} validation error(s) found", .0.len())]
    Validation(Vec<ValidationError>),
}

impl ImportError {
    /// Violations carried by a [`ImportError::Validation`], empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            ImportError::Validation(errors) => errors,
            ImportError::Parse(_) => &[],
        }
    }
}

/// Rejection of a manually entered single record.
#[derive(Debug, Error)]
pub enum ManualEntryError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("{} validation error(s) found", .0.len())]
    Invalid(Vec<ValidationError>),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
