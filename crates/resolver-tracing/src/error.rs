//! Error types for report assembly and configuration.

use serde_json::Value;
use thiserror::Error;

/// Reasons a tracing report could not be attached to a result.
///
/// None of these are fatal to the execution: the result is returned
/// without a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Something else already wrote to the report's extensions key.
    #[error("Could not add `{key}` to `extensions` since `{key}` was unexpectedly already present")]
    SlotOccupied { key: String, existing: Value },

    /// The report could not be converted to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {variable}: {reason}")]
    InvalidValue {
        variable: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid_value(
        variable: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for report assembly
pub type Result<T> = std::result::Result<T, ReportError>;
