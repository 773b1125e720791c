//! Error types for the payload boundary
//!
//! Error taxonomy using thiserror. The chart computations themselves never
//! fail; only turning raw JSON into typed snapshots can.

use thiserror::Error;

/// Errors raised while validating an iteration-detail payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("Invalid number in {field}: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Timestamp out of range in {field}: {value}")]
    InvalidTimestamp { field: String, value: String },

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl PayloadError {
    pub fn invalid_number(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidNumber {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub fn invalid_timestamp(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
