//! Expectation configurations.
//!
//! An expectation is one data-quality rule bound to a column. The rule family
//! is a tagged enum with typed parameters; the validation engine dispatches on
//! the tag, so adding a rule kind never touches the engine's control flow.

use crate::DataValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How null values are treated by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullHandling {
    /// Nulls are left out of the evaluated population
    Exclude,
    /// Nulls count as unexpected values
    Violate,
}

/// Rule kind plus its typed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExpectationKind {
    /// Every value is non-null
    #[serde(rename = "expect_column_values_to_not_be_null")]
    NotNull,

    /// Every value lies in `[min_value, max_value]`, both bounds inclusive
    #[serde(rename = "expect_column_values_to_be_between")]
    Between {
        /// Lower bound (inclusive), unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_value: Option<f64>,
        /// Upper bound (inclusive), unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_value: Option<f64>,
    },

    /// Every value is drawn from `value_set`
    ///
    /// A `null` entry in the set admits null values.
    #[serde(rename = "expect_column_values_to_be_in_set")]
    InSet {
        /// Allowed values
        value_set: Vec<DataValue>,
    },

    /// No non-null value occurs more than once
    #[serde(rename = "expect_column_values_to_be_unique")]
    Unique,

    /// Every value is a string matching `regex`
    #[serde(rename = "expect_column_values_to_match_regex")]
    MatchRegex {
        /// Regular expression, unanchored
        regex: String,
    },
}

impl ExpectationKind {
    /// Conventional expectation type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            ExpectationKind::NotNull => "expect_column_values_to_not_be_null",
            ExpectationKind::Between { .. } => "expect_column_values_to_be_between",
            ExpectationKind::InSet { .. } => "expect_column_values_to_be_in_set",
            ExpectationKind::Unique => "expect_column_values_to_be_unique",
            ExpectationKind::MatchRegex { .. } => "expect_column_values_to_match_regex",
        }
    }

    /// Null treatment when the configuration does not override it.
    ///
    /// `InSet` violates on null unless the set itself contains a null entry;
    /// that admission is handled by membership, not by this default.
    pub fn default_null_handling(&self) -> NullHandling {
        match self {
            ExpectationKind::NotNull | ExpectationKind::InSet { .. } => NullHandling::Violate,
            ExpectationKind::Between { .. }
            | ExpectationKind::Unique
            | ExpectationKind::MatchRegex { .. } => NullHandling::Exclude,
        }
    }
}

/// A rule instance: kind, target column and tolerance.
///
/// Configurations are values; a suite replaces them rather than editing them.
///
/// # Example
///
/// ```rust
/// use quality_core::ExpectationConfig;
///
/// let config = ExpectationConfig::between("age", 20.0, 40.0).with_mostly(0.95);
/// assert_eq!(config.column, "age");
/// assert_eq!(config.kind.type_name(), "expect_column_values_to_be_between");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationConfig {
    /// Target column
    pub column: String,

    /// Rule kind and parameters
    #[serde(flatten)]
    pub kind: ExpectationKind,

    /// Minimum fraction of evaluated values that must pass (default 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mostly: Option<f64>,

    /// Overrides the rule's default null treatment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullHandling>,
}

impl ExpectationConfig {
    /// Creates a configuration for an arbitrary rule kind.
    pub fn new(column: impl Into<String>, kind: ExpectationKind) -> Self {
        Self {
            column: column.into(),
            kind,
            mostly: None,
            nulls: None,
        }
    }

    /// `expect_column_values_to_not_be_null`
    pub fn not_null(column: impl Into<String>) -> Self {
        Self::new(column, ExpectationKind::NotNull)
    }

    /// `expect_column_values_to_be_between` with both bounds set.
    pub fn between(column: impl Into<String>, min_value: f64, max_value: f64) -> Self {
        Self::new(
            column,
            ExpectationKind::Between {
                min_value: Some(min_value),
                max_value: Some(max_value),
            },
        )
    }

    /// `expect_column_values_to_be_in_set`
    pub fn in_set<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        Self::new(
            column,
            ExpectationKind::InSet {
                value_set: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// `expect_column_values_to_be_unique`
    pub fn unique(column: impl Into<String>) -> Self {
        Self::new(column, ExpectationKind::Unique)
    }

    /// `expect_column_values_to_match_regex`
    pub fn match_regex(column: impl Into<String>, regex: impl Into<String>) -> Self {
        Self::new(
            column,
            ExpectationKind::MatchRegex {
                regex: regex.into(),
            },
        )
    }

    /// Sets the tolerated pass fraction.
    pub fn with_mostly(mut self, mostly: f64) -> Self {
        self.mostly = Some(mostly);
        self
    }

    /// Overrides null treatment.
    pub fn with_nulls(mut self, nulls: NullHandling) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Null treatment in effect for this configuration.
    pub fn null_handling(&self) -> NullHandling {
        self.nulls.unwrap_or_else(|| self.kind.default_null_handling())
    }
}

impl fmt::Display for ExpectationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.type_name(), self.column)
    }
}
