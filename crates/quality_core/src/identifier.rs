//! Run and result identifiers.
//!
//! A [`ValidationResultIdentifier`] is the lookup key of the result store. Its
//! key path is deterministic and injective over distinct identifiers. Its
//! segments are suite, run time, run name and batch, so keys sort lexically in
//! the same order as [`ValidationResultIdentifier`]'s `Ord`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Timestamp layout of the run time key segment.
const RUN_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.9fZ";

/// Tags one execution: a run name and the UTC instant it started.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentifier {
    /// Free-form run name
    pub run_name: String,
    /// Run start time
    pub run_time: DateTime<Utc>,
}

impl RunIdentifier {
    /// Creates a run identifier for an explicit instant.
    pub fn new(run_name: impl Into<String>, run_time: DateTime<Utc>) -> Self {
        Self {
            run_name: run_name.into(),
            run_time,
        }
    }

    /// Creates a run identifier stamped with the current time.
    pub fn now(run_name: impl Into<String>) -> Self {
        Self::new(run_name, Utc::now())
    }

    /// Run time rendered as a sortable key segment.
    pub fn run_time_key(&self) -> String {
        self.run_time.format(RUN_TIME_FORMAT).to_string()
    }
}

impl fmt::Display for RunIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.run_name, self.run_time.to_rfc3339())
    }
}

/// Composite key of a stored validation result.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use quality_core::{RunIdentifier, ValidationResultIdentifier};
///
/// let run = RunIdentifier::new("my_run", Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
/// let id = ValidationResultIdentifier::new("my_hello_world_suite", run, "my_batch");
///
/// assert_eq!(
///     id.to_key(),
///     "my_hello_world_suite/20240501T083000.000000000Z/my_run/my_batch"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationResultIdentifier {
    /// Name of the validated suite
    pub suite_name: String,
    /// Run that produced the result
    pub run_id: RunIdentifier,
    /// Label of the validated batch
    pub batch_identifier: String,
}

impl ValidationResultIdentifier {
    /// Creates an identifier.
    pub fn new(
        suite_name: impl Into<String>,
        run_id: RunIdentifier,
        batch_identifier: impl Into<String>,
    ) -> Self {
        Self {
            suite_name: suite_name.into(),
            run_id,
            batch_identifier: batch_identifier.into(),
        }
    }

    /// Key segments: suite, run time, run name, batch. Each is escaped so it is
    /// safe as a single path component.
    pub fn key_segments(&self) -> [String; 4] {
        [
            escape_segment(&self.suite_name),
            self.run_id.run_time_key(),
            escape_segment(&self.run_id.run_name),
            escape_segment(&self.batch_identifier),
        ]
    }

    /// Flat string key, segments joined by `/`.
    pub fn to_key(&self) -> String {
        self.key_segments().join("/")
    }
}

impl fmt::Display for ValidationResultIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

impl PartialOrd for ValidationResultIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValidationResultIdentifier {
    /// Suite, then run time, then run name, then batch.
    fn cmp(&self, other: &Self) -> Ordering {
        self.suite_name
            .cmp(&other.suite_name)
            .then_with(|| self.run_id.run_time.cmp(&other.run_id.run_time))
            .then_with(|| self.run_id.run_name.cmp(&other.run_id.run_name))
            .then_with(|| self.batch_identifier.cmp(&other.batch_identifier))
    }
}

/// Percent-escapes everything outside `[A-Za-z0-9_.-]`, plus a leading dot.
///
/// The empty string maps to a lone `%`, which no other input produces.
fn escape_segment(raw: &str) -> String {
    if raw.is_empty() {
        return "%".to_string();
    }

    let mut escaped = String::with_capacity(raw.len());
    for (idx, byte) in raw.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric()
            || byte == b'_'
            || byte == b'-'
            || (byte == b'.' && idx > 0);
        if keep {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use pretty_assertions::assert_eq;

    fn at(secs: u32, nanos: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs)
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
    }

    #[test]
    fn test_identical_inputs_give_identical_keys() {
        let a = ValidationResultIdentifier::new("suite", RunIdentifier::new("run", at(1, 5)), "batch");
        let b = ValidationResultIdentifier::new("suite", RunIdentifier::new("run", at(1, 5)), "batch");
        assert_eq!(a.to_key(), b.to_key());
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_runs_give_distinct_keys() {
        let base = ValidationResultIdentifier::new("suite", RunIdentifier::new("run", at(1, 0)), "batch");
        let later = ValidationResultIdentifier::new("suite", RunIdentifier::new("run", at(1, 1)), "batch");
        let renamed = ValidationResultIdentifier::new("suite", RunIdentifier::new("run2", at(1, 0)), "batch");

        assert_ne!(base.to_key(), later.to_key());
        assert_ne!(base.to_key(), renamed.to_key());
    }

    #[test]
    fn test_escaping_is_injective() {
        assert_eq!(escape_segment("my_suite-1.0"), "my_suite-1.0");
        assert_eq!(escape_segment("a/b"), "a%2Fb");
        assert_eq!(escape_segment("a%2Fb"), "a%252Fb");
        assert_eq!(escape_segment(".."), "%2E.");
        assert_eq!(escape_segment("with space"), "with%20space");
        assert_eq!(escape_segment(""), "%");
    }

    #[test]
    fn test_ordering_by_suite_then_time() {
        let mut ids = vec![
            ValidationResultIdentifier::new("b", RunIdentifier::new("x", at(1, 0)), "batch"),
            ValidationResultIdentifier::new("a", RunIdentifier::new("z", at(2, 0)), "batch"),
            ValidationResultIdentifier::new("a", RunIdentifier::new("y", at(1, 0)), "batch"),
        ];
        ids.sort();

        let order: Vec<(&str, &str)> = ids
            .iter()
            .map(|id| (id.suite_name.as_str(), id.run_id.run_name.as_str()))
            .collect();
        assert_eq!(order, vec![("a", "y"), ("a", "z"), ("b", "x")]);
    }

    #[test]
    fn test_key_order_matches_ord() {
        let mut ids = vec![
            ValidationResultIdentifier::new("s", RunIdentifier::new("aaa", at(30, 0)), "batch"),
            ValidationResultIdentifier::new("s", RunIdentifier::new("zzz", at(5, 0)), "batch"),
            ValidationResultIdentifier::new("s", RunIdentifier::new("mmm", at(5, 0)), "other"),
            ValidationResultIdentifier::new("r", RunIdentifier::new("zzz", at(59, 0)), "batch"),
        ];
        ids.sort();

        let keys: Vec<String> = ids.iter().map(ValidationResultIdentifier::to_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[1], "s/20240101T000005.000000000Z/mmm/other");
    }

    #[test]
    fn test_run_time_key_sorts_lexically() {
        let early = RunIdentifier::new("r", at(9, 0)).run_time_key();
        let late = RunIdentifier::new("r", at(10, 0)).run_time_key();
        assert_eq!(early, "20240101T000009.000000000Z");
        assert!(early < late);
    }
}
