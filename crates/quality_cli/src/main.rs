mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dqe")]
#[command(version, about = "Data Quality Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data file against an expectation suite and store the result
    Validate {
        /// Path to the data file (CSV, Parquet or NDJSON)
        data: PathBuf,

        /// Path to the expectation suite file (YAML or TOML)
        #[arg(short, long)]
        suite: PathBuf,

        /// Datasource name
        #[arg(long, default_value = "local_files")]
        datasource: String,

        /// Asset name (defaults to the data file stem)
        #[arg(long)]
        asset: Option<String>,

        /// Batch definition name
        #[arg(long, default_value = "my_batch_def")]
        batch_definition: String,

        /// Run name recorded in the result identifier
        #[arg(long, default_value = "manual_run")]
        run_name: String,

        /// Batch label recorded in the result identifier
        #[arg(long)]
        batch_label: Option<String>,

        /// Result store directory (overrides DQE_STORE_DIR)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check an expectation suite file without reading data
    Check {
        /// Path to the expectation suite file (YAML or TOML)
        suite: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List stored validation results
    Results {
        /// Only show results for this suite
        #[arg(long)]
        suite: Option<String>,

        /// Result store directory (overrides DQE_STORE_DIR)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            data,
            suite,
            datasource,
            asset,
            batch_definition,
            run_name,
            batch_label,
            store_dir,
            format,
        } => commands::validate::execute(commands::validate::ValidateArgs {
            data,
            suite,
            datasource,
            asset,
            batch_definition,
            run_name,
            batch_label,
            store_dir,
            format,
        }),

        Commands::Check { suite, format } => commands::check::execute(&suite, format),

        Commands::Results {
            suite,
            store_dir,
            format,
        } => commands::results::execute(suite.as_deref(), store_dir, format),
    }
}
