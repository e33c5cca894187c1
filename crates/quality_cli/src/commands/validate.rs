use anyhow::{anyhow, Context, Result};
use quality_context::{BatchParameters, DataContext};
use quality_core::{FileFormat, RunIdentifier};
use quality_parser::parse_file;
use std::path::PathBuf;
use tracing::info;

use crate::output::{self, OutputFormat};

/// Arguments of `dqe validate`.
pub struct ValidateArgs {
    pub data: PathBuf,
    pub suite: PathBuf,
    pub datasource: String,
    pub asset: Option<String>,
    pub batch_definition: String,
    pub run_name: String,
    pub batch_label: Option<String>,
    pub store_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating {} against {}", args.data.display(), args.suite.display());

    let suite = parse_file(&args.suite)
        .with_context(|| format!("Failed to parse suite file: {}", args.suite.display()))?;

    let format = FileFormat::from_path(&args.data).ok_or_else(|| {
        anyhow!(
            "Cannot infer data format from {} (expected .csv, .parquet or .json)",
            args.data.display()
        )
    })?;

    let asset_name = match args.asset {
        Some(name) => name,
        None => args
            .data
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot derive an asset name from {}", args.data.display()))?,
    };

    let config = super::load_config(args.store_dir)?;
    let context = DataContext::new(config).context("Failed to create data context")?;

    let datasource = context.datasource(&args.datasource)?;
    let asset = context.file_asset(&datasource, &asset_name, format)?;
    let definition = context.path_definition(&asset, &args.batch_definition, &args.data)?;
    let suite = context.add_or_update_suite(suite)?;

    if args.format == OutputFormat::Text {
        output::print_info(&format!(
            "Suite loaded: {} ({} expectations)",
            suite.name,
            suite.len()
        ));
    }

    let mut parameters = BatchParameters::new();
    if let Some(label) = args.batch_label {
        parameters = parameters.with_label(label);
    }

    let stored = context
        .run(
            &definition,
            parameters,
            &suite,
            RunIdentifier::now(args.run_name),
        )
        .context("Validation run failed")?;

    output::print_validation_result(&stored, args.format)?;

    if args.format == OutputFormat::Text {
        output::print_info(&format!(
            "Result stored as {} under {}",
            stored.identifier,
            context.config().store_dir.display()
        ));
    }

    if !stored.result.success {
        std::process::exit(1);
    }

    Ok(())
}
