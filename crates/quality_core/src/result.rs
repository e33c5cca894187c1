//! Validation results.
//!
//! A [`ValidationResult`] is self-describing: every outcome carries the full
//! expectation configuration it was produced from, so a stored result can be
//! rendered without access to the suite or the data.

use crate::{DataValue, ExpectationConfig, RuleEvaluationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics observed while evaluating one expectation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservedResult {
    /// Number of values in the column
    pub element_count: usize,

    /// Number of null values in the column
    pub missing_count: usize,

    /// Number of values that failed the predicate
    pub unexpected_count: usize,

    /// `unexpected_count` as a percentage of the evaluated (non-excluded) values
    pub unexpected_percent: f64,

    /// First few unexpected values, in row order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partial_unexpected_list: Vec<DataValue>,

    /// Row indices of the first few unexpected values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unexpected_index_list: Vec<usize>,

    /// Occurrences beyond the first of each repeated value (uniqueness only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_count: Option<usize>,
}

/// Outcome of one expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationOutcome {
    /// Configuration that was evaluated
    pub expectation_config: ExpectationConfig,

    /// Whether the expectation held
    pub success: bool,

    /// Observed statistics; absent when the predicate could not be computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ObservedResult>,

    /// Why the predicate could not be computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<RuleEvaluationError>,
}

impl ExpectationOutcome {
    /// Outcome of an expectation that was computed.
    pub fn evaluated(config: ExpectationConfig, success: bool, result: ObservedResult) -> Self {
        Self {
            expectation_config: config,
            success,
            result: Some(result),
            exception: None,
        }
    }

    /// Outcome of an expectation that could not be computed. Always a failure.
    pub fn errored(config: ExpectationConfig, error: RuleEvaluationError) -> Self {
        Self {
            expectation_config: config,
            success: false,
            result: None,
            exception: Some(error),
        }
    }

    /// Returns true if the predicate could not be computed.
    pub fn is_error(&self) -> bool {
        self.exception.is_some()
    }
}

/// Aggregate counts over a result's outcomes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationStatistics {
    /// Number of expectations evaluated
    pub evaluated_expectations: usize,
    /// Number that held
    pub successful_expectations: usize,
    /// Number that failed or errored
    pub unsuccessful_expectations: usize,
    /// Share of successful expectations, 0 to 100
    pub success_percent: f64,
}

impl ValidationStatistics {
    /// Computes statistics from outcomes.
    pub fn from_outcomes(outcomes: &[ExpectationOutcome]) -> Self {
        let evaluated = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.success).count();
        let success_percent = if evaluated == 0 {
            100.0
        } else {
            successful as f64 / evaluated as f64 * 100.0
        };

        Self {
            evaluated_expectations: evaluated,
            successful_expectations: successful,
            unsuccessful_expectations: evaluated - successful,
            success_percent,
        }
    }
}

/// Context of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    /// Validated suite
    pub suite_name: String,
    /// Validated batch
    pub batch_label: String,
    /// Rows in the batch
    pub row_count: usize,
    /// When evaluation finished
    pub validation_time: DateTime<Utc>,
    /// Evaluation duration in milliseconds
    pub duration_ms: u64,
}

/// Outcome of evaluating a suite against a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Logical AND of every outcome's success
    pub success: bool,

    /// One outcome per expectation, in suite order
    pub results: Vec<ExpectationOutcome>,

    /// Aggregate counts
    pub statistics: ValidationStatistics,

    /// Run context
    pub meta: ResultMeta,
}

impl ValidationResult {
    /// Assembles a result. `success` and `statistics` are derived from the outcomes.
    pub fn new(results: Vec<ExpectationOutcome>, meta: ResultMeta) -> Self {
        Self {
            success: results.iter().all(|o| o.success),
            statistics: ValidationStatistics::from_outcomes(&results),
            results,
            meta,
        }
    }

    /// Outcomes that did not hold, in suite order.
    pub fn failures(&self) -> impl Iterator<Item = &ExpectationOutcome> {
        self.results.iter().filter(|o| !o.success)
    }
}
