use anyhow::{Context, Result};
use quality_context::{FilesystemResultStore, ResultStore};
use std::path::PathBuf;
use tracing::info;

use crate::output::{self, OutputFormat};

pub fn execute(suite: Option<&str>, store_dir: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = super::load_config(store_dir)?;
    info!("Listing results under {}", config.store_dir.display());

    let store = FilesystemResultStore::new(&config.store_dir);
    let mut entries = store
        .entries()
        .with_context(|| format!("Failed to read results from {}", config.store_dir.display()))?;

    if let Some(name) = suite {
        entries.retain(|entry| entry.identifier.suite_name == name);
    }

    output::print_results_listing(&entries, format)
}
