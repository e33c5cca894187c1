use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use quality_context::StoredResult;
use quality_core::{ExpectationOutcome, ExpectationSuite, ValidationResultIdentifier};
use serde_json::json;

/// Report rendering for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_validation_result(stored: &StoredResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(stored),
        OutputFormat::Text => {
            print_text_report(stored);
            Ok(())
        }
    }
}

fn print_text_report(stored: &StoredResult) {
    let result = &stored.result;

    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));
    println!("  Suite: {}", result.meta.suite_name);
    println!("  Batch: {} ({} rows)", result.meta.batch_label, result.meta.row_count);
    println!("  Run:   {}", stored.identifier.run_id);

    if result.success {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    println!("\n{}", "Expectations:".bold());
    for (i, outcome) in result.results.iter().enumerate() {
        print_outcome(i + 1, outcome);
    }

    let stats = &result.statistics;
    println!("\n{}", "Summary:".bold());
    println!("  Evaluated:    {}", stats.evaluated_expectations);
    println!("  Successful:   {}", stats.successful_expectations);
    println!("  Unsuccessful: {}", stats.unsuccessful_expectations);
    println!("  Success:      {:.2}%", stats.success_percent);
    println!("  Duration:     {} ms", result.meta.duration_ms);
    println!("{}", "═".repeat(60));
}

fn print_outcome(position: usize, outcome: &ExpectationOutcome) {
    let config = outcome.expectation_config.to_string();

    if let Some(error) = &outcome.exception {
        println!(
            "  {}. {} {}: {}",
            position,
            "✗".red().bold(),
            config,
            error.to_string().red()
        );
        return;
    }

    if outcome.success {
        println!("  {}. {} {}", position, "✓".green().bold(), config);
        return;
    }

    let Some(observed) = &outcome.result else {
        println!("  {}. {} {}", position, "✗".red().bold(), config);
        return;
    };

    let examples = observed
        .partial_unexpected_list
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "  {}. {} {}: {}",
        position,
        "✗".red().bold(),
        config,
        format!(
            "{} of {} unexpected ({:.2}%), e.g. [{}]",
            observed.unexpected_count,
            observed.element_count,
            observed.unexpected_percent,
            examples
        )
        .red()
    );
}

pub fn print_suite_summary(suite: &ExpectationSuite, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "valid": true,
            "suite": suite,
        })),
        OutputFormat::Text => {
            print_success(&format!("Suite '{}' is valid", suite.name));
            println!("\n{}", "Expectations:".bold());
            for (i, config) in suite.expectations().iter().enumerate() {
                match config.mostly {
                    Some(mostly) => println!("  {}. {} (mostly {})", i + 1, config, mostly),
                    None => println!("  {}. {}", i + 1, config),
                }
            }
            println!("\n  Total: {}", suite.len());
            Ok(())
        }
    }
}

pub fn print_results_listing(entries: &[StoredResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                print_info("No stored validation results");
                return Ok(());
            }

            for entry in entries {
                let marker = if entry.result.success {
                    "✓".green().bold()
                } else {
                    "✗".red().bold()
                };
                println!(
                    "{} {} {:.2}%",
                    marker,
                    describe(&entry.identifier),
                    entry.result.statistics.success_percent
                );
            }
            println!("\n  Total: {}", entries.len());
            Ok(())
        }
    }
}

fn describe(identifier: &ValidationResultIdentifier) -> String {
    format!(
        "{} | {} | {}",
        identifier.suite_name, identifier.run_id, identifier.batch_identifier
    )
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
