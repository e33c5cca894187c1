//! DataFusion-backed table reader.

use crate::{ReaderError, ReaderOptions, record_batches_to_table};
use datafusion::prelude::{
    CsvReadOptions, DataFrame, NdJsonReadOptions, ParquetReadOptions, SessionContext,
};
use quality_core::{FileFormat, QualityError, Table};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Capability to materialize a file as a [`Table`].
///
/// The batch resolver only depends on this trait, so tests and embedders can
/// substitute their own source.
pub trait TableReader: Send + Sync {
    /// Reads the file at `path` in the given format.
    ///
    /// # Errors
    ///
    /// Returns `QualityError::SourceUnavailable` if the file is missing or
    /// cannot be decoded.
    fn read(&self, path: &Path, format: FileFormat) -> quality_core::Result<Table>;
}

/// Reads CSV, Parquet and NDJSON files through DataFusion.
///
/// DataFusion is async; the reader drives it on a private current-thread
/// Tokio runtime so callers stay blocking. Calling [`TableReader::read`] from
/// inside another Tokio runtime panics.
pub struct DataFusionReader {
    runtime: Runtime,
    options: ReaderOptions,
}

impl std::fmt::Debug for DataFusionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFusionReader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DataFusionReader {
    /// Creates a reader with default options.
    pub fn new() -> Result<Self, ReaderError> {
        Self::with_options(ReaderOptions::default())
    }

    /// Creates a reader with explicit options.
    pub fn with_options(options: ReaderOptions) -> Result<Self, ReaderError> {
        options.validate()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ReaderError::RuntimeError(e.to_string()))?;

        Ok(Self { runtime, options })
    }

    /// Options in effect.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Reads a file into a table.
    pub fn read_table(&self, path: &Path, format: FileFormat) -> Result<Table, ReaderError> {
        if !path.is_file() {
            return Err(ReaderError::NotFound(path.display().to_string()));
        }

        info!("Reading {} file: {}", format, path.display());
        let table = self.runtime.block_on(self.scan(path, format))?;
        info!(
            "Read {} rows, {} columns from {}",
            table.row_count(),
            table.columns().len(),
            path.display()
        );

        Ok(table)
    }

    async fn scan(&self, path: &Path, format: FileFormat) -> Result<Table, ReaderError> {
        let location = path.to_str().ok_or_else(|| {
            ReaderError::DataReadError(format!("path is not valid UTF-8: {}", path.display()))
        })?;
        // DataFusion filters listed files by extension, so use the file's own.
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let ctx = SessionContext::new();
        let mut df: DataFrame = match format {
            FileFormat::Csv => {
                let options = CsvReadOptions::new()
                    .has_header(self.options.has_header)
                    .delimiter(self.options.delimiter)
                    .file_extension(&extension);
                ctx.read_csv(location, options).await?
            }
            FileFormat::Parquet => {
                let options = ParquetReadOptions {
                    file_extension: &extension,
                    ..Default::default()
                };
                ctx.read_parquet(location, options).await?
            }
            FileFormat::Json => {
                let options = NdJsonReadOptions::default().file_extension(&extension);
                ctx.read_json(location, options).await?
            }
        };

        if let Some(limit) = self.options.row_limit {
            df = df.limit(0, Some(limit))?;
        }

        let column_names: Vec<String> = df
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();
        debug!("Scan schema: {:?}", column_names);

        let batches = df.collect().await?;
        debug!("Collected {} record batches", batches.len());

        record_batches_to_table(&column_names, &batches)
    }
}

impl TableReader for DataFusionReader {
    fn read(&self, path: &Path, format: FileFormat) -> quality_core::Result<Table> {
        self.read_table(path, format)
            .map_err(|e| QualityError::source_unavailable(path.display().to_string(), e.to_string()))
    }
}
