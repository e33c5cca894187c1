//! Error types for the data quality engine.
//!
//! Two families live here. [`QualityError`] is fatal to the operation that
//! raised it: provisioning, batch resolution, result storage. [`RuleEvaluationError`]
//! describes a single expectation that could not be computed; it is recorded in
//! that expectation's outcome and never aborts a validation run.

use crate::ResourceKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for data quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Main error type for data quality operations.
#[derive(Error, Debug)]
pub enum QualityError {
    /// A registry entry exists under the same key but is incompatible with the request
    #[error("Resource conflict for {kind} '{name}': {message}")]
    ResourceConflict {
        /// Kind of resource being provisioned
        kind: ResourceKind,
        /// Qualified resource name
        name: String,
        /// Description of the incompatibility
        message: String,
    },

    /// The underlying data of a batch could not be read
    #[error("Data source unavailable at '{location}': {message}")]
    SourceUnavailable {
        /// Path or handle that was being read
        location: String,
        /// Failure details
        message: String,
    },

    /// Table construction failed
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Result store failure
    #[error("Result store error: {0}")]
    Store(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QualityError {
    /// Creates a new resource conflict error.
    pub fn conflict(kind: ResourceKind, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceConflict {
            kind,
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new source unavailable error.
    pub fn source_unavailable(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// An expectation whose predicate could not be computed.
///
/// Distinct from an expectation that evaluates and fails: the latter has
/// observed statistics, this one only has a reason.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RuleEvaluationError {
    /// Target column is absent from the batch
    #[error("Column '{column}' not found in batch")]
    MissingColumn {
        /// Requested column name
        column: String,
    },

    /// Expectation parameters are unusable (e.g. min above max, bad regex)
    #[error("Invalid parameters for '{expectation}': {message}")]
    InvalidParameters {
        /// Expectation type name
        expectation: String,
        /// Failure details
        message: String,
    },
}

impl RuleEvaluationError {
    /// Creates a new missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Creates a new invalid parameters error.
    pub fn invalid_parameters(expectation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            expectation: expectation.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QualityError::conflict(
            ResourceKind::Asset,
            "my_datasource/my_asset",
            "already registered as a csv asset",
        );
        assert_eq!(
            err.to_string(),
            "Resource conflict for asset 'my_datasource/my_asset': already registered as a csv asset"
        );

        let err = QualityError::source_unavailable("data/missing.csv", "file not found");
        assert_eq!(
            err.to_string(),
            "Data source unavailable at 'data/missing.csv': file not found"
        );
    }

    #[test]
    fn test_rule_error_serialization() {
        let err = RuleEvaluationError::missing_column("age");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"error":"missing_column","column":"age"}"#);

        let back: RuleEvaluationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
