//! Configuration for a data context.

use quality_core::{QualityError, Result};
use quality_validator::DEFAULT_PARTIAL_UNEXPECTED_COUNT;
use std::path::PathBuf;

/// Environment variable naming the result store directory.
pub const STORE_DIR_ENV: &str = "DQE_STORE_DIR";

/// Environment variable capping example values per outcome.
pub const PARTIAL_UNEXPECTED_COUNT_ENV: &str = "DQE_PARTIAL_UNEXPECTED_COUNT";

/// Default result store directory.
pub const DEFAULT_STORE_DIR: &str = "./dqe";

/// Settings shared by every run of a [`DataContext`](crate::DataContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Root directory of the filesystem result store
    pub store_dir: PathBuf,

    /// Cap on unexpected values and indices kept per outcome
    pub partial_unexpected_count: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            partial_unexpected_count: DEFAULT_PARTIAL_UNEXPECTED_COUNT,
        }
    }
}

impl ContextConfig {
    /// Creates a new builder for `ContextConfig`.
    pub fn builder() -> ContextConfigBuilder {
        ContextConfigBuilder::default()
    }

    /// Reads `DQE_STORE_DIR` and `DQE_PARTIAL_UNEXPECTED_COUNT`, falling back
    /// to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(dir) = lookup(STORE_DIR_ENV) {
            builder = builder.store_dir(dir);
        }

        if let Some(raw) = lookup(PARTIAL_UNEXPECTED_COUNT_ENV) {
            let count = raw.trim().parse::<usize>().map_err(|e| {
                QualityError::Configuration(format!(
                    "{PARTIAL_UNEXPECTED_COUNT_ENV}='{raw}' is not a valid count: {e}"
                ))
            })?;
            builder = builder.partial_unexpected_count(count);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.store_dir.as_os_str().is_empty() {
            return Err(QualityError::Configuration(
                "store_dir cannot be empty".to_string(),
            ));
        }

        if self.partial_unexpected_count == 0 {
            return Err(QualityError::Configuration(
                "partial_unexpected_count must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for `ContextConfig`.
#[derive(Debug, Clone, Default)]
pub struct ContextConfigBuilder {
    store_dir: Option<PathBuf>,
    partial_unexpected_count: Option<usize>,
}

impl ContextConfigBuilder {
    /// Sets the result store directory.
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Sets the cap on example values per outcome.
    pub fn partial_unexpected_count(mut self, count: usize) -> Self {
        self.partial_unexpected_count = Some(count);
        self
    }

    /// Builds the `ContextConfig`.
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> Result<ContextConfig> {
        let defaults = ContextConfig::default();
        let config = ContextConfig {
            store_dir: self.store_dir.unwrap_or(defaults.store_dir),
            partial_unexpected_count: self
                .partial_unexpected_count
                .unwrap_or(defaults.partial_unexpected_count),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ContextConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ContextConfig::default());
        assert_eq!(config.store_dir, PathBuf::from("./dqe"));
        assert_eq!(config.partial_unexpected_count, 20);
    }

    #[test]
    fn test_env_overrides() {
        let config = ContextConfig::from_lookup(lookup(&[
            (STORE_DIR_ENV, "/tmp/results"),
            (PARTIAL_UNEXPECTED_COUNT_ENV, " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.store_dir, PathBuf::from("/tmp/results"));
        assert_eq!(config.partial_unexpected_count, 5);
    }

    #[test]
    fn test_invalid_values() {
        let err = ContextConfig::from_lookup(lookup(&[(PARTIAL_UNEXPECTED_COUNT_ENV, "many")]))
            .unwrap_err();
        assert!(matches!(err, QualityError::Configuration(_)));

        assert!(ContextConfig::builder().store_dir("").build().is_err());
        assert!(ContextConfig::builder()
            .partial_unexpected_count(0)
            .build()
            .is_err());
    }
}
