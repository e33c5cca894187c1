//! Rule library.
//!
//! Each expectation kind reduces a column to one [`Verdict`] per value; the
//! shared summary step turns verdicts into observed statistics and a success
//! flag. Rules handle nulls explicitly, and a NaN float counts as a null:
//! - `not_null`: a null is always unexpected
//! - `between`, `unique`, `match_regex`: nulls are excluded unless the
//!   configuration says `nulls: violate`
//! - `in_set`: a null is unexpected unless the set holds a `null` entry, or the
//!   configuration says `nulls: exclude`

use quality_core::{
    Column, DataValue, ExpectationConfig, ExpectationKind, NullHandling, ObservedResult,
    RuleEvaluationError,
};
use regex::Regex;
use std::collections::HashMap;

/// Default cap on example values and indices kept per outcome.
pub const DEFAULT_PARTIAL_UNEXPECTED_COUNT: usize = 20;

/// Options shared by every rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOptions {
    /// Maximum number of unexpected values and indices reported per outcome
    pub partial_unexpected_count: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            partial_unexpected_count: DEFAULT_PARTIAL_UNEXPECTED_COUNT,
        }
    }
}

/// Per-value outcome of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Value satisfies the predicate
    Expected,
    /// Value violates the predicate
    Unexpected,
    /// Value is left out of the evaluated population
    Excluded,
}

/// Success flag plus statistics for one rule over one column.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    /// Whether the rule held within its `mostly` tolerance
    pub success: bool,
    /// Observed statistics
    pub observed: ObservedResult,
}

/// Evaluates one expectation against its target column.
///
/// # Errors
///
/// Returns a [`RuleEvaluationError`] if the expectation's parameters make the
/// predicate uncomputable. A column that evaluates and violates the predicate
/// is not an error.
pub fn evaluate(
    config: &ExpectationConfig,
    column: &Column,
    options: &EvaluationOptions,
) -> Result<RuleVerdict, RuleEvaluationError> {
    let mostly = checked_mostly(config)?;
    let verdicts = verdicts(config, column)?;
    let duplicate_count = matches!(config.kind, ExpectationKind::Unique)
        .then(|| duplicate_count(column.values()));

    Ok(summarize(column, &verdicts, mostly, duplicate_count, options))
}

/// Computes one verdict per value of `column`.
pub fn verdicts(
    config: &ExpectationConfig,
    column: &Column,
) -> Result<Vec<Verdict>, RuleEvaluationError> {
    let values = column.values();
    let on_null = null_verdict(config.null_handling());

    let verdicts = match &config.kind {
        ExpectationKind::NotNull => values
            .iter()
            .map(|v| if v.is_null() { Verdict::Unexpected } else { Verdict::Expected })
            .collect(),

        ExpectationKind::Between {
            min_value,
            max_value,
        } => {
            check_bounds(config, *min_value, *max_value)?;
            values
                .iter()
                .map(|v| {
                    if v.is_null() {
                        on_null
                    } else {
                        in_range(v, *min_value, *max_value)
                    }
                })
                .collect()
        }

        ExpectationKind::InSet { value_set } => {
            let admits_null = value_set.iter().any(DataValue::is_null);
            values
                .iter()
                .map(|v| match v {
                    missing if missing.is_null() => {
                        if admits_null {
                            Verdict::Expected
                        } else {
                            on_null
                        }
                    }
                    other if value_set.iter().any(|allowed| allowed.loosely_equals(other)) => {
                        Verdict::Expected
                    }
                    _ => Verdict::Unexpected,
                })
                .collect()
        }

        ExpectationKind::Unique => {
            let counts = occurrence_counts(values);
            values
                .iter()
                .map(|v| match ValueKey::of(v) {
                    None => on_null,
                    Some(key) if counts.get(&key).copied().unwrap_or(0) > 1 => Verdict::Unexpected,
                    Some(_) => Verdict::Expected,
                })
                .collect()
        }

        ExpectationKind::MatchRegex { regex } => {
            let regex = Regex::new(regex).map_err(|e| {
                RuleEvaluationError::invalid_parameters(config.kind.type_name(), e.to_string())
            })?;
            values
                .iter()
                .map(|v| match v {
                    missing if missing.is_null() => on_null,
                    DataValue::String(s) if regex.is_match(s) => Verdict::Expected,
                    _ => Verdict::Unexpected,
                })
                .collect()
        }
    };

    Ok(verdicts)
}

fn null_verdict(handling: NullHandling) -> Verdict {
    match handling {
        NullHandling::Exclude => Verdict::Excluded,
        NullHandling::Violate => Verdict::Unexpected,
    }
}

fn checked_mostly(config: &ExpectationConfig) -> Result<f64, RuleEvaluationError> {
    match config.mostly {
        None => Ok(1.0),
        Some(m) if (0.0..=1.0).contains(&m) => Ok(m),
        Some(m) => Err(RuleEvaluationError::invalid_parameters(
            config.kind.type_name(),
            format!("mostly must be within [0, 1], got {m}"),
        )),
    }
}

fn check_bounds(
    config: &ExpectationConfig,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), RuleEvaluationError> {
    let invalid = |message: String| {
        RuleEvaluationError::invalid_parameters(config.kind.type_name(), message)
    };

    if min.is_some_and(f64::is_nan) || max.is_some_and(f64::is_nan) {
        return Err(invalid("bounds cannot be NaN".to_string()));
    }

    match (min, max) {
        (None, None) => Err(invalid(
            "at least one of min_value and max_value is required".to_string(),
        )),
        (Some(lo), Some(hi)) if lo > hi => Err(invalid(format!(
            "min_value {lo} is greater than max_value {hi}"
        ))),
        _ => Ok(()),
    }
}

/// Inclusive on both ends. Non-numeric values are unexpected.
fn in_range(value: &DataValue, min: Option<f64>, max: Option<f64>) -> Verdict {
    let inside = match value {
        DataValue::Int(i) => int_in_range(*i, min, max),
        DataValue::Float(x) => min.is_none_or(|lo| *x >= lo) && max.is_none_or(|hi| *x <= hi),
        _ => false,
    };

    if inside {
        Verdict::Expected
    } else {
        Verdict::Unexpected
    }
}

/// Integer comparison without a round trip through `f64`.
///
/// `v >= lo` is `v >= ceil(lo)` for integral `v`. Float to `i128` casts
/// saturate, so infinite and out-of-range bounds keep their order.
fn int_in_range(value: i64, min: Option<f64>, max: Option<f64>) -> bool {
    let value = i128::from(value);
    min.is_none_or(|lo| value >= lo.ceil() as i128)
        && max.is_none_or(|hi| value <= hi.floor() as i128)
}

/// Hashable identity of a non-null value. Integral floats share the integer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(&'a str),
}

impl<'a> ValueKey<'a> {
    fn of(value: &'a DataValue) -> Option<Self> {
        match value {
            DataValue::Null => None,
            DataValue::Float(f) if f.is_nan() => None,
            DataValue::Bool(b) => Some(ValueKey::Bool(*b)),
            DataValue::Int(i) => Some(ValueKey::Int(*i)),
            DataValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(ValueKey::Int(*f as i64))
            }
            DataValue::Float(f) => Some(ValueKey::Float(f.to_bits())),
            DataValue::String(s) => Some(ValueKey::Str(s)),
        }
    }
}

fn occurrence_counts(values: &[DataValue]) -> HashMap<ValueKey<'_>, usize> {
    let mut counts = HashMap::new();
    for key in values.iter().filter_map(ValueKey::of) {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Occurrences beyond the first of every repeated non-null value.
fn duplicate_count(values: &[DataValue]) -> usize {
    occurrence_counts(values).values().map(|c| c - 1).sum()
}

fn summarize(
    column: &Column,
    verdicts: &[Verdict],
    mostly: f64,
    duplicate_count: Option<usize>,
    options: &EvaluationOptions,
) -> RuleVerdict {
    let evaluated = verdicts.iter().filter(|v| **v != Verdict::Excluded).count();
    let unexpected: Vec<usize> = verdicts
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == Verdict::Unexpected)
        .map(|(idx, _)| idx)
        .collect();

    let unexpected_count = unexpected.len();
    let (success, unexpected_percent) = if evaluated == 0 {
        (true, 0.0)
    } else {
        let passing = (evaluated - unexpected_count) as f64 / evaluated as f64;
        (
            passing >= mostly,
            unexpected_count as f64 / evaluated as f64 * 100.0,
        )
    };

    let limit = options.partial_unexpected_count;
    let unexpected_index_list: Vec<usize> = unexpected.into_iter().take(limit).collect();
    let partial_unexpected_list = unexpected_index_list
        .iter()
        .map(|idx| column.values()[*idx].clone())
        .collect();

    RuleVerdict {
        success,
        observed: ObservedResult {
            element_count: column.len(),
            missing_count: column.null_count(),
            unexpected_count,
            unexpected_percent,
            partial_unexpected_list,
            unexpected_index_list,
            duplicate_count,
        },
    }
}
