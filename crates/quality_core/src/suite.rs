//! Expectation suites.

use crate::{ExpectationConfig, Resource, ResourceKey, ResourceKind};
use serde::{Deserialize, Serialize};

/// An ordered, named collection of expectations.
///
/// Insertion order is evaluation and reporting order. Suites are values: to
/// change a registered suite, clone it, edit the clone and replace the stored
/// version as a whole.
///
/// # Example
///
/// ```rust
/// use quality_core::{ExpectationConfig, ExpectationSuite};
///
/// let mut suite = ExpectationSuite::new("my_hello_world_suite");
/// assert!(suite.is_empty());
///
/// suite.add(ExpectationConfig::not_null("name"));
/// suite.add(ExpectationConfig::between("age", 20.0, 40.0));
/// assert_eq!(suite.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    /// Unique suite name
    pub name: String,

    /// Expectations in evaluation order
    #[serde(default)]
    expectations: Vec<ExpectationConfig>,
}

impl ExpectationSuite {
    /// Creates an empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
        }
    }

    /// Creates a suite with the given expectations.
    pub fn with_expectations(name: impl Into<String>, expectations: Vec<ExpectationConfig>) -> Self {
        Self {
            name: name.into(),
            expectations,
        }
    }

    /// Appends an expectation.
    pub fn add(&mut self, config: ExpectationConfig) {
        self.expectations.push(config);
    }

    /// Returns true if the suite has no expectations.
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Returns the number of expectations.
    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    /// Returns the expectations in evaluation order.
    pub fn expectations(&self) -> &[ExpectationConfig] {
        &self.expectations
    }

    /// Replaces the expectation at `index`, returning the previous one.
    ///
    /// Returns `None` and leaves the suite untouched if `index` is out of range.
    pub fn replace(&mut self, index: usize, config: ExpectationConfig) -> Option<ExpectationConfig> {
        let slot = self.expectations.get_mut(index)?;
        Some(std::mem::replace(slot, config))
    }

    /// Appends every expectation of `other` not already present, keeping order.
    ///
    /// Returns how many expectations were added.
    pub fn merge(&mut self, other: &ExpectationSuite) -> usize {
        let mut added = 0;
        for config in &other.expectations {
            if !self.expectations.contains(config) {
                self.expectations.push(config.clone());
                added += 1;
            }
        }
        added
    }
}

impl Resource for ExpectationSuite {
    const KIND: ResourceKind = ResourceKind::ExpectationSuite;

    fn key(&self) -> ResourceKey {
        ResourceKey::suite(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_preserves_order() {
        let mut suite = ExpectationSuite::new("employees_suite");
        suite.add(ExpectationConfig::unique("id"));
        suite.add(ExpectationConfig::not_null("name"));

        let columns: Vec<&str> = suite.expectations().iter().map(|e| e.column.as_str()).collect();
        assert_eq!(columns, vec!["id", "name"]);
    }

    #[test]
    fn test_replace() {
        let mut suite = ExpectationSuite::new("s");
        suite.add(ExpectationConfig::between("age", 0.0, 10.0));

        let previous = suite.replace(0, ExpectationConfig::between("age", 0.0, 120.0));
        assert_eq!(previous, Some(ExpectationConfig::between("age", 0.0, 10.0)));
        assert_eq!(suite.expectations()[0], ExpectationConfig::between("age", 0.0, 120.0));
        assert_eq!(suite.replace(5, ExpectationConfig::unique("id")), None);
        assert_eq!(suite.len(), 1);
    }

    #[test]
    fn test_merge_skips_existing() {
        let mut suite = ExpectationSuite::new("s");
        suite.add(ExpectationConfig::not_null("name"));

        let other = ExpectationSuite::with_expectations(
            "s",
            vec![
                ExpectationConfig::not_null("name"),
                ExpectationConfig::unique("id"),
            ],
        );

        assert_eq!(suite.merge(&other), 1);
        assert_eq!(suite.len(), 2);
        assert_eq!(suite.merge(&other), 0);
    }

    #[test]
    fn test_missing_expectations_default_to_empty() {
        let suite: ExpectationSuite = serde_json::from_str(r#"{"name": "empty"}"#).unwrap();
        assert!(suite.is_empty());
        assert_eq!(suite.key(), ResourceKey::suite("empty"));
    }
}
