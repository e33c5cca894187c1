//! Validation result stores.
//!
//! A store maps a [`ValidationResultIdentifier`] to the [`ValidationResult`]
//! recorded under it. A second `put` with an identical identifier overwrites
//! the first (last writer wins); identifiers embed a nanosecond run time, so
//! that only happens when a caller reuses a run identifier deliberately.

use quality_core::{QualityError, Result, ValidationResult, ValidationResultIdentifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Directory under the store root holding validation results.
const VALIDATIONS_DIR: &str = "validations";

/// A result together with the identifier it is stored under.
///
/// This is also the on-disk envelope of [`FilesystemResultStore`], which makes
/// every stored file self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    /// Store key
    pub identifier: ValidationResultIdentifier,
    /// Stored result
    pub result: ValidationResult,
}

/// Durable mapping from result identifiers to results.
pub trait ResultStore: Send + Sync {
    /// Stores `result` under `identifier`, replacing any previous entry.
    fn put(&self, identifier: &ValidationResultIdentifier, result: &ValidationResult) -> Result<()>;

    /// Loads the result stored under `identifier`.
    fn get(&self, identifier: &ValidationResultIdentifier) -> Result<Option<ValidationResult>>;

    /// Every stored identifier, sorted by suite, run time, run name and batch.
    fn list(&self) -> Result<Vec<ValidationResultIdentifier>>;

    /// Every stored entry, in [`list`](Self::list) order.
    fn entries(&self) -> Result<Vec<StoredResult>> {
        let mut entries = Vec::new();
        for identifier in self.list()? {
            if let Some(result) = self.get(&identifier)? {
                entries.push(StoredResult { identifier, result });
            }
        }
        Ok(entries)
    }
}

/// Result store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: RwLock<BTreeMap<ValidationResultIdentifier, ValidationResult>>,
}

impl InMemoryResultStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for InMemoryResultStore {
    fn put(&self, identifier: &ValidationResultIdentifier, result: &ValidationResult) -> Result<()> {
        self.results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identifier.clone(), result.clone());
        debug!("Stored validation result {}", identifier);
        Ok(())
    }

    fn get(&self, identifier: &ValidationResultIdentifier) -> Result<Option<ValidationResult>> {
        Ok(self
            .results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned())
    }

    fn list(&self) -> Result<Vec<ValidationResultIdentifier>> {
        Ok(self
            .results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }
}

/// Result store writing one JSON file per result.
///
/// Layout: `<root>/validations/<suite>/<run_time>/<run_name>/<batch>.json`,
/// with each segment escaped by
/// [`ValidationResultIdentifier::key_segments`]. Files are written to a
/// temporary file in the target directory and renamed into place.
#[derive(Debug, Clone)]
pub struct FilesystemResultStore {
    root: PathBuf,
}

impl FilesystemResultStore {
    /// Creates a store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds (or would hold) the result for `identifier`.
    pub fn path_for(&self, identifier: &ValidationResultIdentifier) -> PathBuf {
        let [suite, run_time, run_name, batch] = identifier.key_segments();
        self.root
            .join(VALIDATIONS_DIR)
            .join(suite)
            .join(run_time)
            .join(run_name)
            .join(format!("{batch}.json"))
    }

    fn read_envelope(path: &Path) -> Result<StoredResult> {
        let content = fs::read(path)?;
        serde_json::from_slice(&content).map_err(|e| {
            QualityError::Store(format!("corrupt result file {}: {e}", path.display()))
        })
    }
}

impl ResultStore for FilesystemResultStore {
    fn put(&self, identifier: &ValidationResultIdentifier, result: &ValidationResult) -> Result<()> {
        let path = self.path_for(identifier);
        let dir = path
            .parent()
            .ok_or_else(|| QualityError::Store(format!("no parent for {}", path.display())))?;
        fs::create_dir_all(dir)?;

        let envelope = StoredResult {
            identifier: identifier.clone(),
            result: result.clone(),
        };
        let content = serde_json::to_vec_pretty(&envelope)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&content)?;
        file.persist(&path).map_err(|e| QualityError::Io(e.error))?;

        info!("Stored validation result at {}", path.display());
        Ok(())
    }

    fn get(&self, identifier: &ValidationResultIdentifier) -> Result<Option<ValidationResult>> {
        let path = self.path_for(identifier);
        if !path.is_file() {
            return Ok(None);
        }

        let envelope = Self::read_envelope(&path)?;
        if &envelope.identifier != identifier {
            return Err(QualityError::Store(format!(
                "{} holds the result for '{}'",
                path.display(),
                envelope.identifier
            )));
        }
        Ok(Some(envelope.result))
    }

    fn list(&self) -> Result<Vec<ValidationResultIdentifier>> {
        let mut files = Vec::new();
        collect_json_files(&self.root.join(VALIDATIONS_DIR), &mut files)?;

        let mut identifiers = files
            .iter()
            .map(|path| Self::read_envelope(path).map(|envelope| envelope.identifier))
            .collect::<Result<Vec<_>>>()?;
        identifiers.sort();
        Ok(identifiers)
    }
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}
