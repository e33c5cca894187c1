//! File readers for the Data Quality Engine.
//!
//! This crate turns CSV, Parquet and newline-delimited JSON files into the
//! engine's columnar [`Table`](quality_core::Table). Reading goes through
//! DataFusion; Arrow arrays are converted column by column into
//! [`DataValue`](quality_core::DataValue)s.
//!
//! # Example
//!
//! ```no_run
//! use quality_core::FileFormat;
//! use quality_io::{DataFusionReader, TableReader};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DataFusionReader::new()?;
//! let table = reader.read(Path::new("data/employees.csv"), FileFormat::Csv)?;
//! println!("Read {} rows", table.row_count());
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod converter;
mod options;
mod reader;

pub use converter::{array_to_values, record_batches_to_table};
pub use options::{ReaderOptions, ReaderOptionsBuilder};
pub use reader::{DataFusionReader, TableReader};

/// Error types specific to file reading.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// DataFusion failed to scan or collect the file
    #[error("Failed to read data: {0}")]
    DataReadError(String),

    /// Arrow value could not be converted
    #[error("Failed to convert Arrow value: {0}")]
    TypeConversionError(String),

    /// Invalid reader configuration
    #[error("Invalid reader configuration: {0}")]
    ConfigurationError(String),

    /// Async runtime could not be started
    #[error("Failed to start reader runtime: {0}")]
    RuntimeError(String),
}

impl From<datafusion::error::DataFusionError> for ReaderError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        ReaderError::DataReadError(err.to_string())
    }
}
