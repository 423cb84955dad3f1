//! Error type shared by every ComplianceWatch crate.

use thiserror::Error;

/// Everything that can go wrong while reading configuration or producing a screen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Monitoring was requested without a drug name.
    #[error("please enter a drug name to start monitoring")]
    MissingDrugName,

    #[error("unknown data source '{0}' (expected one of: reddit, twitter, facebook, forums, faers)")]
    UnknownSource(String),

    #[error("unknown monitoring period '{0}' (expected one of: 24h, 7d, 30d, 90d)")]
    UnknownTimeWindow(String),

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u8,
        max: u8,
    },
}

impl Error {
    /// Whether the error came from missing user input rather than malformed input.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingDrugName)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
