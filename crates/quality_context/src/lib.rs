//! # Data Quality Context
//!
//! Public entry point of the Data Quality Engine. A [`DataContext`] owns:
//!
//! - a [`Registry`] with idempotent get-or-create over datasources, assets,
//!   batch definitions and expectation suites
//! - a [`BatchResolver`] that materializes a fresh batch for every run
//! - the validation engine
//! - a [`ResultStore`] keyed by validation result identifiers
//!
//! Configuration comes from [`ContextConfig`], built explicitly or read from
//! `DQE_*` environment variables.

mod config;
mod context;
mod registry;
mod resolver;
mod store;

pub use config::*;
pub use context::*;
pub use registry::*;
pub use resolver::*;
pub use store::*;
