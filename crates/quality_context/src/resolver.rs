//! Batch resolution.

use quality_core::{Batch, BatchDefinition, BatchStrategy, QualityError, Resource, Result, Table};
use quality_io::TableReader;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runtime inputs to a batch resolution.
#[derive(Debug, Clone, Default)]
pub struct BatchParameters {
    /// In-memory table for whole-dataframe definitions
    pub dataframe: Option<Table>,

    /// Batch label; defaults to the definition's label
    pub label: Option<String>,
}

impl BatchParameters {
    /// Empty parameters, enough for path-backed definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters carrying an in-memory table.
    pub fn dataframe(table: Table) -> Self {
        Self {
            dataframe: Some(table),
            label: None,
        }
    }

    /// Sets an explicit batch label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Turns a batch definition plus runtime parameters into a [`Batch`].
///
/// Nothing is cached: every call reads the source again, since the data may
/// have changed between runs. Schema problems are not detected here; they show
/// up as rule evaluation errors.
pub struct BatchResolver {
    reader: Arc<dyn TableReader>,
}

impl BatchResolver {
    /// Creates a resolver reading files through `reader`.
    pub fn new(reader: Arc<dyn TableReader>) -> Self {
        Self { reader }
    }

    /// Resolves a fresh batch.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if a whole-dataframe definition gets no
    /// dataframe, or if a path-backed file cannot be read.
    pub fn resolve(&self, definition: &BatchDefinition, parameters: BatchParameters) -> Result<Batch> {
        let BatchParameters { dataframe, label } = parameters;

        let table = match &definition.strategy {
            BatchStrategy::WholeDataFrame => dataframe.ok_or_else(|| {
                QualityError::source_unavailable(
                    definition.key().to_string(),
                    "whole-dataframe batch definition requires a dataframe parameter",
                )
            })?,
            BatchStrategy::Path { path, format } => {
                if dataframe.is_some() {
                    warn!(
                        definition = %definition.key(),
                        "Ignoring dataframe parameter for a path-backed batch definition"
                    );
                }
                self.reader.read(path, *format)?
            }
        };

        let batch = Batch::from_definition(definition, label, table);
        debug!(
            batch = %batch.label(),
            rows = batch.table().row_count(),
            "Resolved batch"
        );
        Ok(batch)
    }
}
