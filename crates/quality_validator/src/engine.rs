//! Main validation engine.
//!
//! This module provides the `Validator` that evaluates every expectation of a
//! suite against a batch and assembles the `ValidationResult`.

use crate::{EvaluationOptions, evaluate};
use chrono::Utc;
use quality_core::{
    Batch, ExpectationConfig, ExpectationOutcome, ExpectationSuite, ResultMeta,
    RuleEvaluationError, ValidationResult,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Validation engine.
///
/// Evaluates expectations in suite order, independently of each other. A rule
/// whose predicate cannot be computed (missing column, invalid parameters)
/// becomes a failed outcome carrying the error; the run itself never aborts.
///
/// # Example
///
/// ```rust
/// use quality_core::{Batch, ExpectationSuite, SuiteBuilder, Table};
/// use quality_validator::Validator;
///
/// let table = Table::builder()
///     .column("currency", ["USD", "EUR", "USD"])
///     .build()
///     .unwrap();
/// let suite = SuiteBuilder::new("transactions_suite")
///     .expect_column_values_to_be_in_set("currency", ["USD", "EUR"])
///     .build();
///
/// let result = Validator::new().validate(&Batch::new("batch", table), &suite);
/// assert!(result.success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: EvaluationOptions,
}

impl Validator {
    /// Creates a validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with explicit options.
    pub fn with_options(options: EvaluationOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Validates a batch against a suite.
    ///
    /// # Returns
    ///
    /// A `ValidationResult` with one outcome per expectation, in suite order.
    /// `success` is the conjunction of all outcomes; an empty suite succeeds.
    pub fn validate(&self, batch: &Batch, suite: &ExpectationSuite) -> ValidationResult {
        let start = Instant::now();
        info!(
            suite = %suite.name,
            batch = %batch.label(),
            rows = batch.table().row_count(),
            expectations = suite.len(),
            "Validating batch"
        );

        let outcomes: Vec<ExpectationOutcome> = suite
            .expectations()
            .iter()
            .map(|config| self.evaluate_expectation(batch, config))
            .collect();

        let meta = ResultMeta {
            suite_name: suite.name.clone(),
            batch_label: batch.label().to_string(),
            row_count: batch.table().row_count(),
            validation_time: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        let result = ValidationResult::new(outcomes, meta);

        if result.success {
            info!(
                suite = %suite.name,
                duration_ms = result.meta.duration_ms,
                "Validation passed"
            );
        } else {
            warn!(
                suite = %suite.name,
                failed = result.statistics.unsuccessful_expectations,
                evaluated = result.statistics.evaluated_expectations,
                "Validation failed"
            );
        }

        result
    }

    fn evaluate_expectation(&self, batch: &Batch, config: &ExpectationConfig) -> ExpectationOutcome {
        let evaluation = batch
            .table()
            .column(&config.column)
            .ok_or_else(|| RuleEvaluationError::missing_column(&config.column))
            .and_then(|column| evaluate(config, column, &self.options));

        match evaluation {
            Ok(verdict) => {
                debug!(
                    expectation = %config,
                    success = verdict.success,
                    unexpected = verdict.observed.unexpected_count,
                    "Evaluated expectation"
                );
                ExpectationOutcome::evaluated(config.clone(), verdict.success, verdict.observed)
            }
            Err(e) => {
                warn!(expectation = %config, error = %e, "Expectation could not be evaluated");
                ExpectationOutcome::errored(config.clone(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quality_core::{SuiteBuilder, Table};

    fn batch() -> Batch {
        let table = Table::builder()
            .column("id", [1, 2, 3])
            .column("age", [25, 30, 45])
            .build()
            .unwrap();
        Batch::new("test_batch", table)
    }

    #[test]
    fn test_empty_suite_passes() {
        let result = Validator::new().validate(&batch(), &ExpectationSuite::new("empty"));
        assert!(result.success);
        assert!(result.results.is_empty());
        assert_eq!(result.meta.row_count, 3);
        assert_eq!(result.meta.batch_label, "test_batch");
    }

    #[test]
    fn test_missing_column_is_recorded() {
        let suite = SuiteBuilder::new("suite")
            .expect_column_values_to_not_be_null("missing")
            .expect_column_values_to_be_unique("id")
            .build();

        let result = Validator::new().validate(&batch(), &suite);
        assert!(!result.success);
        assert_eq!(result.results.len(), 2);
        assert_eq!(
            result.results[0].exception,
            Some(RuleEvaluationError::missing_column("missing"))
        );
        assert!(result.results[1].success);
    }

    #[test]
    fn test_invalid_parameters_do_not_abort() {
        let suite = SuiteBuilder::new("suite")
            .expect_column_values_to_be_between("age", 50.0, 10.0)
            .expect_column_values_to_be_between("age", 20.0, 50.0)
            .build();

        let result = Validator::new().validate(&batch(), &suite);
        assert!(!result.success);
        assert!(result.results[0].is_error());
        assert!(result.results[1].success);
        assert_eq!(result.statistics.successful_expectations, 1);
    }

    #[test]
    fn test_options_cap_examples() {
        let validator = Validator::with_options(EvaluationOptions {
            partial_unexpected_count: 1,
        });
        let suite = SuiteBuilder::new("suite")
            .expect_column_values_to_be_between("age", 0.0, 10.0)
            .build();

        let result = validator.validate(&batch(), &suite);
        let observed = result.results[0].result.as_ref().unwrap();
        assert_eq!(observed.unexpected_count, 3);
        assert_eq!(observed.unexpected_index_list, vec![0]);
    }
}
