//! Provisioned resources and the batches they resolve to.
//!
//! Datasources, assets, batch definitions and expectation suites are the four
//! named resource kinds kept in a registry. Each one knows its own
//! [`ResourceKey`] and whether another instance under the same key describes
//! the same thing, which is all a registry needs to provide idempotent
//! get-or-create semantics generically.

use crate::{QualityError, Result, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The four kinds of named resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Logical source of tabular data
    Datasource,
    /// Dataset exposed by a datasource
    Asset,
    /// Slicing strategy over an asset
    BatchDefinition,
    /// Named collection of expectations
    ExpectationSuite,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Datasource => "datasource",
            ResourceKind::Asset => "asset",
            ResourceKind::BatchDefinition => "batch definition",
            ResourceKind::ExpectationSuite => "expectation suite",
        };
        f.write_str(name)
    }
}

/// Stable address of a resource: its kind plus the name path that identifies it.
///
/// Assets are scoped by their datasource and batch definitions by their asset,
/// so the path has one, two or three segments. Keeping segments separate means
/// names containing `/` can never alias one another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    /// Resource kind
    pub kind: ResourceKind,
    /// Name segments, outermost scope first
    pub path: Vec<String>,
}

impl ResourceKey {
    /// Key of a datasource.
    pub fn datasource(name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Datasource,
            path: vec![name.into()],
        }
    }

    /// Key of an asset within a datasource.
    pub fn asset(datasource: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Asset,
            path: vec![datasource.into(), name.into()],
        }
    }

    /// Key of a batch definition within an asset.
    pub fn batch_definition(
        datasource: impl Into<String>,
        asset: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: ResourceKind::BatchDefinition,
            path: vec![datasource.into(), asset.into(), name.into()],
        }
    }

    /// Key of an expectation suite.
    pub fn suite(name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::ExpectationSuite,
            path: vec![name.into()],
        }
    }

    /// Innermost name segment.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join("/"))
    }
}

/// A resource that can be kept in a registry.
///
/// # Example
///
/// ```rust
/// use quality_core::{Datasource, Resource, ResourceKey, ResourceKind};
///
/// let datasource = Datasource::new("my_pandas_datasource");
/// assert_eq!(Datasource::KIND, ResourceKind::Datasource);
/// assert_eq!(datasource.key(), ResourceKey::datasource("my_pandas_datasource"));
/// ```
pub trait Resource: Send + Sync + 'static {
    /// Kind shared by every instance of this type.
    const KIND: ResourceKind;

    /// Registry key of this instance.
    fn key(&self) -> ResourceKey;

    /// Explains why `requested` cannot be served by `self`, if it cannot.
    ///
    /// Both values share a key. The default accepts anything.
    fn incompatibility(&self, _requested: &Self) -> Option<String> {
        None
    }
}

/// Supported file formats for file-backed assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma separated values with a header row
    Csv,
    /// Apache Parquet columnar format
    Parquet,
    /// Newline delimited JSON
    Json,
}

impl FileFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "parquet" | "pq" => Some(FileFormat::Parquet),
            "json" | "ndjson" | "jsonl" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Csv => "csv",
            FileFormat::Parquet => "parquet",
            FileFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// A logical, named source of tabular data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    /// Unique datasource name
    pub name: String,
}

impl Datasource {
    /// Creates a datasource descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Resource for Datasource {
    const KIND: ResourceKind = ResourceKind::Datasource;

    fn key(&self) -> ResourceKey {
        ResourceKey::datasource(&self.name)
    }
}

/// How an asset's data is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    /// In-memory table passed at batch time
    DataFrame,
    /// File read at batch time
    File {
        /// Physical format of the file
        format: FileFormat,
    },
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::DataFrame => f.write_str("dataframe"),
            AssetKind::File { format } => write!(f, "{format} file"),
        }
    }
}

/// A specific dataset exposed by a datasource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Owning datasource name
    pub datasource: String,
    /// Asset name, unique within the datasource
    pub name: String,
    /// How the data is supplied
    pub kind: AssetKind,
}

impl Asset {
    /// Describes an asset fed by in-memory tables.
    pub fn dataframe(datasource: &Datasource, name: impl Into<String>) -> Self {
        Self {
            datasource: datasource.name.clone(),
            name: name.into(),
            kind: AssetKind::DataFrame,
        }
    }

    /// Describes an asset backed by files of the given format.
    pub fn file(datasource: &Datasource, name: impl Into<String>, format: FileFormat) -> Self {
        Self {
            datasource: datasource.name.clone(),
            name: name.into(),
            kind: AssetKind::File { format },
        }
    }
}

impl Resource for Asset {
    const KIND: ResourceKind = ResourceKind::Asset;

    fn key(&self) -> ResourceKey {
        ResourceKey::asset(&self.datasource, &self.name)
    }

    fn incompatibility(&self, requested: &Self) -> Option<String> {
        (self.kind != requested.kind).then(|| {
            format!(
                "already registered as a {} asset, requested a {} asset",
                self.kind, requested.kind
            )
        })
    }
}

/// How a batch definition slices its asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchStrategy {
    /// The whole in-memory table supplied at batch time
    WholeDataFrame,
    /// The full content of one file
    Path {
        /// File location
        path: PathBuf,
        /// Physical format of the file
        format: FileFormat,
    },
}

impl fmt::Display for BatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStrategy::WholeDataFrame => f.write_str("whole dataframe"),
            BatchStrategy::Path { path, format } => {
                write!(f, "{format} file at '{}'", path.display())
            }
        }
    }
}

/// Describes how to turn an asset into a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDefinition {
    /// Owning datasource name
    pub datasource: String,
    /// Owning asset name
    pub asset: String,
    /// Definition name, unique within the asset
    pub name: String,
    /// Slicing strategy, fixed for the life of the asset
    pub strategy: BatchStrategy,
}

impl BatchDefinition {
    /// Defines a batch as the whole dataframe passed at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::ResourceConflict`] if the asset is file-backed.
    pub fn whole_dataframe(asset: &Asset, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if asset.kind != AssetKind::DataFrame {
            return Err(QualityError::conflict(
                ResourceKind::BatchDefinition,
                ResourceKey::batch_definition(&asset.datasource, &asset.name, &name).to_string(),
                format!("a whole-dataframe definition needs a dataframe asset, found a {} asset", asset.kind),
            ));
        }

        Ok(Self {
            datasource: asset.datasource.clone(),
            asset: asset.name.clone(),
            name,
            strategy: BatchStrategy::WholeDataFrame,
        })
    }

    /// Defines a batch as the content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::ResourceConflict`] if the asset is dataframe-backed.
    pub fn path(asset: &Asset, name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        let AssetKind::File { format } = asset.kind else {
            return Err(QualityError::conflict(
                ResourceKind::BatchDefinition,
                ResourceKey::batch_definition(&asset.datasource, &asset.name, &name).to_string(),
                "a path definition needs a file asset, found a dataframe asset",
            ));
        };

        Ok(Self {
            datasource: asset.datasource.clone(),
            asset: asset.name.clone(),
            name,
            strategy: BatchStrategy::Path {
                path: path.into(),
                format,
            },
        })
    }

    /// Default label for batches resolved from this definition.
    pub fn batch_label(&self) -> String {
        format!("{}-{}-{}", self.datasource, self.asset, self.name)
    }
}

impl Resource for BatchDefinition {
    const KIND: ResourceKind = ResourceKind::BatchDefinition;

    fn key(&self) -> ResourceKey {
        ResourceKey::batch_definition(&self.datasource, &self.asset, &self.name)
    }

    fn incompatibility(&self, requested: &Self) -> Option<String> {
        (self.strategy != requested.strategy).then(|| {
            format!(
                "already defined as {}, requested {}",
                self.strategy, requested.strategy
            )
        })
    }
}

/// An immutable, materialized set of rows to validate.
///
/// Batches are resolved fresh for every run and never persisted.
#[derive(Debug, Clone)]
pub struct Batch {
    label: String,
    definition: Option<ResourceKey>,
    table: Table,
    resolved_at: DateTime<Utc>,
}

impl Batch {
    /// Wraps a table as an ad-hoc batch with the given label.
    pub fn new(label: impl Into<String>, table: Table) -> Self {
        Self {
            label: label.into(),
            definition: None,
            table,
            resolved_at: Utc::now(),
        }
    }

    /// Wraps a table resolved from a batch definition.
    pub fn from_definition(definition: &BatchDefinition, label: Option<String>, table: Table) -> Self {
        Self {
            label: label.unwrap_or_else(|| definition.batch_label()),
            definition: Some(definition.key()),
            table,
            resolved_at: Utc::now(),
        }
    }

    /// Batch identity used in result identifiers.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Key of the definition this batch was resolved from, if any.
    pub fn definition(&self) -> Option<&ResourceKey> {
        self.definition.as_ref()
    }

    /// The rows of this batch.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// When the batch was materialized.
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_keep_segments_apart() {
        let a = ResourceKey::asset("a/b", "c");
        let b = ResourceKey::asset("a", "b/c");
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "a/b/c");
        assert_eq!(a.name(), "c");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_path(Path::new("data/employees.csv")), Some(FileFormat::Csv));
        assert_eq!(
            FileFormat::from_path(Path::new("data/transactions.PARQUET")),
            Some(FileFormat::Parquet)
        );
        assert_eq!(FileFormat::from_path(Path::new("events.jsonl")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_asset_incompatibility() {
        let datasource = Datasource::new("files");
        let csv = Asset::file(&datasource, "employees", FileFormat::Csv);
        let parquet = Asset::file(&datasource, "employees", FileFormat::Parquet);

        assert!(csv.incompatibility(&csv.clone()).is_none());
        let reason = csv.incompatibility(&parquet).unwrap();
        assert!(reason.contains("csv file"));
        assert!(reason.contains("parquet file"));
    }

    #[test]
    fn test_batch_definition_requires_matching_asset() {
        let datasource = Datasource::new("memory");
        let frame = Asset::dataframe(&datasource, "frame");
        let file = Asset::file(&datasource, "file", FileFormat::Csv);

        assert!(BatchDefinition::whole_dataframe(&frame, "all").is_ok());
        assert!(matches!(
            BatchDefinition::whole_dataframe(&file, "all"),
            Err(QualityError::ResourceConflict { .. })
        ));
        assert!(matches!(
            BatchDefinition::path(&frame, "all", "x.csv"),
            Err(QualityError::ResourceConflict { .. })
        ));

        let definition = BatchDefinition::path(&file, "all", "data/employees.csv").unwrap();
        assert_eq!(
            definition.strategy,
            BatchStrategy::Path {
                path: PathBuf::from("data/employees.csv"),
                format: FileFormat::Csv,
            }
        );
        assert_eq!(definition.batch_label(), "memory-file-all");
    }

    #[test]
    fn test_batch_definition_incompatibility() {
        let datasource = Datasource::new("files");
        let asset = Asset::file(&datasource, "employees", FileFormat::Csv);
        let first = BatchDefinition::path(&asset, "my_batch_def", "a.csv").unwrap();
        let second = BatchDefinition::path(&asset, "my_batch_def", "b.csv").unwrap();

        assert!(first.incompatibility(&first.clone()).is_none());
        assert!(first.incompatibility(&second).is_some());
    }

    #[test]
    fn test_batch_from_definition() {
        let datasource = Datasource::new("memory");
        let asset = Asset::dataframe(&datasource, "frame");
        let definition = BatchDefinition::whole_dataframe(&asset, "all").unwrap();

        let batch = Batch::from_definition(&definition, None, Table::empty());
        assert_eq!(batch.label(), "memory-frame-all");
        assert_eq!(batch.definition(), Some(&definition.key()));

        let batch = Batch::from_definition(&definition, Some("my_batch".into()), Table::empty());
        assert_eq!(batch.label(), "my_batch");
    }
}
