//! # Data Quality Core
//!
//! Core data structures and types for the Data Quality Engine.
//!
//! The engine registers a dataset's logical identity, attaches a named suite of
//! data-quality rules ("expectations") to it, evaluates those rules against a
//! materialized batch and records the outcome under a deterministic key.
//!
//! ## Key Concepts
//!
//! - **Datasource / Asset / BatchDefinition**: named, registry-owned descriptions
//!   of where data lives and how to slice it
//! - **Batch**: an immutable table resolved fresh for one run
//! - **ExpectationSuite**: an ordered, named list of [`ExpectationConfig`]s
//! - **ValidationResult**: overall success plus one outcome per expectation
//! - **ValidationResultIdentifier**: suite + run + batch, the result store key
//!
//! ## Example
//!
//! ```rust
//! use quality_core::{ExpectationConfig, ExpectationSuite, Table};
//!
//! let table = Table::builder()
//!     .column("name", [Some("Alice"), None, Some("Charlie")])
//!     .column("age", [25, 30, 150])
//!     .build()
//!     .unwrap();
//!
//! let mut suite = ExpectationSuite::new("my_hello_world_suite");
//! if suite.is_empty() {
//!     suite.add(ExpectationConfig::not_null("name"));
//!     suite.add(ExpectationConfig::between("age", 20.0, 40.0));
//! }
//!
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(suite.len(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod expectation;
pub mod identifier;
pub mod resource;
pub mod result;
pub mod suite;
pub mod table;

pub use builder::*;
pub use error::*;
pub use expectation::*;
pub use identifier::*;
pub use resource::*;
pub use result::*;
pub use suite::*;
pub use table::*;
