//! Parser for expectation suite files (YAML/TOML formats).
//!
//! This module loads expectation suites from YAML and TOML files into the
//! strongly-typed `ExpectationSuite` structure.
//!
//! # Example
//!
//! ```rust
//! use quality_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: employees_suite
//! expectations:
//!   - type: expect_column_values_to_be_unique
//!     column: id
//!   - type: expect_column_values_to_be_between
//!     column: salary
//!     min_value: 0
//!     max_value: 200000
//! "#;
//!
//! let suite = parse_yaml(yaml).expect("Failed to parse suite");
//! assert_eq!(suite.name, "employees_suite");
//! assert_eq!(suite.len(), 2);
//! ```

use quality_core::ExpectationSuite;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during suite parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Well-formed document that does not describe a usable suite
    #[error("Invalid suite: {0}")]
    InvalidSuite(String),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported suite file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a suite from a YAML string.
///
/// # Example
///
/// ```rust
/// use quality_parser::parse_yaml;
///
/// let yaml = r#"
/// name: transactions_suite
/// expectations:
///   - type: expect_column_values_to_be_in_set
///     column: currency
///     value_set: [USD, EUR]
/// "#;
///
/// let suite = parse_yaml(yaml).unwrap();
/// assert_eq!(suite.name, "transactions_suite");
/// ```
pub fn parse_yaml(content: &str) -> Result<ExpectationSuite> {
    let suite: ExpectationSuite = serde_yaml_ng::from_str(content)?;
    check_suite(suite)
}

/// Parse a suite from a TOML string.
///
/// # Example
///
/// ```rust
/// use quality_parser::parse_toml;
///
/// let toml = r#"
/// name = "transactions_suite"
///
/// [[expectations]]
/// type = "expect_column_values_to_not_be_null"
/// column = "timestamp"
/// "#;
///
/// let suite = parse_toml(toml).unwrap();
/// assert_eq!(suite.len(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<ExpectationSuite> {
    let suite: ExpectationSuite =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    check_suite(suite)
}

fn check_suite(suite: ExpectationSuite) -> Result<ExpectationSuite> {
    if suite.name.trim().is_empty() {
        return Err(ParserError::InvalidSuite("suite name cannot be empty".to_string()));
    }
    if let Some(config) = suite.expectations().iter().find(|c| c.column.is_empty()) {
        return Err(ParserError::InvalidSuite(format!(
            "{} has an empty column name",
            config.kind.type_name()
        )));
    }
    Ok(suite)
}

/// Detect the suite format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SuiteFormat::Yaml`
/// * `.toml` → `SuiteFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SuiteFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SuiteFormat::Yaml),
        "toml" => Ok(SuiteFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a suite from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use quality_parser::parse_file;
/// use std::path::Path;
///
/// let suite = parse_file(Path::new("suites/employees.yml")).unwrap();
/// println!("Loaded suite: {}", suite.name);
/// ```
pub fn parse_file(path: &Path) -> Result<ExpectationSuite> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        SuiteFormat::Yaml => parse_yaml(&content),
        SuiteFormat::Toml => parse_toml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::{DataValue, ExpectationConfig, ExpectationKind, NullHandling, SuiteBuilder};
    use std::io::Write;

    #[test]
    fn test_parse_yaml_all_kinds() {
        let yaml = r#"
name: employees_suite
expectations:
  - type: expect_column_values_to_be_unique
    column: id
  - type: expect_column_values_to_be_in_set
    column: department
    value_set: [Engineering, Marketing, HR, Sales]
  - type: expect_column_values_to_be_between
    column: salary
    min_value: 0
    max_value: 200000
    mostly: 0.95
  - type: expect_column_values_to_not_be_null
    column: name
  - type: expect_column_values_to_match_regex
    column: email
    regex: "^[^@]+@[^@]+$"
    nulls: violate
"#;

        let suite = parse_yaml(yaml).expect("Failed to parse valid YAML");

        let expected = SuiteBuilder::new("employees_suite")
            .expect_column_values_to_be_unique("id")
            .expect_column_values_to_be_in_set(
                "department",
                ["Engineering", "Marketing", "HR", "Sales"],
            )
            .expectation(ExpectationConfig::between("salary", 0.0, 200000.0).with_mostly(0.95))
            .expect_column_values_to_not_be_null("name")
            .expectation(
                ExpectationConfig::match_regex("email", "^[^@]+@[^@]+$")
                    .with_nulls(NullHandling::Violate),
            )
            .build();

        assert_eq!(suite, expected);
    }

    #[test]
    fn test_parse_yaml_null_sentinel() {
        let yaml = r#"
name: s
expectations:
  - type: expect_column_values_to_be_in_set
    column: code
    value_set: [A, 1, 2.5, true, null]
"#;

        let suite = parse_yaml(yaml).unwrap();
        let ExpectationKind::InSet { value_set } = &suite.expectations()[0].kind else {
            panic!("expected in_set");
        };
        assert_eq!(
            value_set,
            &vec![
                DataValue::from("A"),
                DataValue::Int(1),
                DataValue::Float(2.5),
                DataValue::Bool(true),
                DataValue::Null,
            ]
        );
    }

    #[test]
    fn test_parse_yaml_without_expectations() {
        let suite = parse_yaml("name: empty_suite\n").unwrap();
        assert!(suite.is_empty());
    }

    #[test]
    fn test_parse_yaml_open_bound() {
        let yaml = r#"
name: s
expectations:
  - type: expect_column_values_to_be_between
    column: amount
    min_value: 0
"#;

        let suite = parse_yaml(yaml).unwrap();
        assert_eq!(
            suite.expectations()[0].kind,
            ExpectationKind::Between {
                min_value: Some(0.0),
                max_value: None
            }
        );
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
name: s
expectations:
  - type: expect_column_values_to_be_sorted
    column: id
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_missing_name() {
        let result = parse_yaml("expectations: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_yaml_blank_name() {
        let result = parse_yaml("name: \"  \"\n");
        assert!(matches!(result.unwrap_err(), ParserError::InvalidSuite(_)));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
name = "transactions_suite"

[[expectations]]
type = "expect_column_values_to_be_between"
column = "amount"
min_value = 0
max_value = 10000

[[expectations]]
type = "expect_column_values_to_be_in_set"
column = "currency"
value_set = ["USD", "EUR"]

[[expectations]]
type = "expect_column_values_to_not_be_null"
column = "timestamp"
"#;

        let suite = parse_toml(toml).expect("Failed to parse valid TOML");

        let expected = SuiteBuilder::new("transactions_suite")
            .expect_column_values_to_be_between("amount", 0.0, 10000.0)
            .expect_column_values_to_be_in_set("currency", ["USD", "EUR"])
            .expect_column_values_to_not_be_null("timestamp")
            .build();
        assert_eq!(suite, expected);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let invalid_toml = r#"
name = "test"
[[[invalid syntax
"#;

        let result = parse_toml(invalid_toml);
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("suite.yaml")).unwrap(), SuiteFormat::Yaml);
        assert_eq!(detect_format(Path::new("suite.YML")).unwrap(), SuiteFormat::Yaml);
        assert_eq!(detect_format(Path::new("suite.toml")).unwrap(), SuiteFormat::Toml);
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("suite.json"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));

        let result = detect_format(Path::new("suite"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "name: file_suite").unwrap();
        writeln!(file, "expectations:").unwrap();
        writeln!(file, "  - type: expect_column_values_to_be_unique").unwrap();
        writeln!(file, "    column: id").unwrap();

        let suite = parse_file(file.path()).expect("Failed to parse suite file");
        assert_eq!(suite.name, "file_suite");
        assert_eq!(suite.expectations()[0], ExpectationConfig::unique("id"));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.yml"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }
}
