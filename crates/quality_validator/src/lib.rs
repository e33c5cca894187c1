//! # Data Quality Validator
//!
//! Rule library and validation engine. This crate evaluates an
//! [`ExpectationSuite`](quality_core::ExpectationSuite) against a resolved
//! [`Batch`](quality_core::Batch):
//!
//! - Rule evaluation per expectation kind (not-null, between, in-set, unique, regex)
//! - Explicit null handling per rule
//! - `mostly` tolerance and observed statistics per outcome
//! - No short-circuit: every rule produces an outcome
//!
//! ## Example
//!
//! ```rust
//! use quality_core::{Batch, ExpectationConfig, ExpectationSuite, Table};
//! use quality_validator::Validator;
//!
//! let table = Table::builder()
//!     .column("name", [Some("Alice"), None, Some("Charlie")])
//!     .column("age", [25, 30, 150])
//!     .build()
//!     .unwrap();
//! let batch = Batch::new("my_batch", table);
//!
//! let suite = ExpectationSuite::with_expectations(
//!     "my_hello_world_suite",
//!     vec![
//!         ExpectationConfig::not_null("name"),
//!         ExpectationConfig::between("age", 20.0, 40.0),
//!     ],
//! );
//!
//! let result = Validator::new().validate(&batch, &suite);
//! assert!(!result.success);
//! assert_eq!(result.failures().count(), 2);
//! ```

mod engine;
mod rules;

pub use engine::*;
pub use rules::*;
