//! Builder pattern for creating expectation suites.
//!
//! This module provides an ergonomic builder for assembling a suite with a
//! fluent API, using the conventional expectation names.

use crate::{DataValue, ExpectationConfig, ExpectationSuite};

/// Builder for creating an `ExpectationSuite`.
///
/// # Example
///
/// ```rust
/// use quality_core::SuiteBuilder;
///
/// let suite = SuiteBuilder::new("employees_suite")
///     .expect_column_values_to_be_unique("id")
///     .expect_column_values_to_be_in_set("department", ["Engineering", "Marketing", "HR", "Sales"])
///     .expect_column_values_to_be_between("salary", 0.0, 200000.0)
///     .expect_column_values_to_not_be_null("name")
///     .build();
///
/// assert_eq!(suite.len(), 4);
/// ```
#[derive(Debug)]
pub struct SuiteBuilder {
    name: String,
    expectations: Vec<ExpectationConfig>,
}

impl SuiteBuilder {
    /// Creates a new suite builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
        }
    }

    /// Adds a pre-built expectation.
    pub fn expectation(mut self, config: ExpectationConfig) -> Self {
        self.expectations.push(config);
        self
    }

    /// Adds a not-null expectation.
    pub fn expect_column_values_to_not_be_null(self, column: impl Into<String>) -> Self {
        self.expectation(ExpectationConfig::not_null(column))
    }

    /// Adds an inclusive range expectation.
    pub fn expect_column_values_to_be_between(
        self,
        column: impl Into<String>,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        self.expectation(ExpectationConfig::between(column, min_value, max_value))
    }

    /// Adds a set membership expectation.
    pub fn expect_column_values_to_be_in_set<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        self.expectation(ExpectationConfig::in_set(column, values))
    }

    /// Adds a uniqueness expectation.
    pub fn expect_column_values_to_be_unique(self, column: impl Into<String>) -> Self {
        self.expectation(ExpectationConfig::unique(column))
    }

    /// Adds a regex expectation.
    pub fn expect_column_values_to_match_regex(
        self,
        column: impl Into<String>,
        regex: impl Into<String>,
    ) -> Self {
        self.expectation(ExpectationConfig::match_regex(column, regex))
    }

    /// Builds the suite.
    pub fn build(self) -> ExpectationSuite {
        ExpectationSuite::with_expectations(self.name, self.expectations)
    }
}
