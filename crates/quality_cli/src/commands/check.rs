use anyhow::{Context, Result};
use quality_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::output::{self, OutputFormat};

pub fn execute(suite_path: &Path, format: OutputFormat) -> Result<()> {
    info!("Checking suite: {}", suite_path.display());

    // Parsing rejects unknown expectation types and malformed parameters
    let suite = parse_file(suite_path)
        .with_context(|| format!("Failed to parse suite file: {}", suite_path.display()))?;

    output::print_suite_summary(&suite, format)
}
