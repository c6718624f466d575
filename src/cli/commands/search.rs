//! Search command: find terms in a document, analyze matches, store products.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::cli::helpers::{open_repository, truncate};
use crate::config::{Config, Settings};
use crate::export::{write_search_results, ExportError};
use crate::llm::LlmClient;
use crate::pipeline::{analyze_and_store, Overrides};
use crate::search::{search_file, SearchOutcome};

#[derive(Args)]
pub struct SearchArgs {
    /// Spreadsheet (.xlsx/.xls), PDF or Word (.docx/.doc) file
    pub file: PathBuf,
    /// Comma-separated search terms
    #[arg(short, long)]
    pub terms: String,
    /// Brand to store instead of the extracted one
    #[arg(long)]
    pub brand: Option<String>,
    /// Product name to store instead of the extracted one
    #[arg(long)]
    pub product_name: Option<String>,
    /// Only search; skip LLM analysis and storage
    #[arg(long)]
    pub no_analyze: bool,
    /// Also write the matches to this .xlsx file
    #[arg(short, long)]
    pub export: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TermResult<'a> {
    term: &'a str,
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
}

pub fn cmd_search(settings: &Settings, config: &Config, args: SearchArgs) -> anyhow::Result<()> {
    if !args.file.exists() {
        anyhow::bail!("File not found: {}", args.file.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Searching {}...", args.file.display()));
    let results = search_file(&args.file, &args.terms, &config.extraction);
    pb.finish_and_clear();

    if results.is_empty() {
        anyhow::bail!("No search terms given");
    }

    if args.json {
        let report: Vec<TermResult> = results
            .iter()
            .map(|(term, outcome)| TermResult { term, outcome })
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&results);
    }

    if let Some(ref output) = args.export {
        match write_search_results(output, &results) {
            Ok(()) => println!(
                "{} Exported matches to {}",
                style("✓").green(),
                output.display()
            ),
            Err(ExportError::Empty) => {
                println!("{} No matches to export", style("!").yellow())
            }
            Err(e) => return Err(e.into()),
        }
    }

    if args.no_analyze || results.iter().all(|(_, outcome)| !outcome.has_matches()) {
        return Ok(());
    }

    let client = match LlmClient::new(config.llm.clone()) {
        Ok(client) => client,
        Err(e) => {
            println!(
                "{} Skipping analysis: {}",
                style("!").yellow(),
                style(e).dim()
            );
            return Ok(());
        }
    };
    let repo = open_repository(settings)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Analyzing with {}...", client.config().model));
    let overrides = Overrides {
        brand: args.brand.as_deref(),
        product_name: args.product_name.as_deref(),
    };
    let report = analyze_and_store(&results, &client, &repo, overrides)?;
    pb.finish_and_clear();

    for term in &report.stored {
        println!("{} Stored product for '{}'", style("✓").green(), term);
    }
    for (term, reason) in &report.failed {
        println!(
            "{} Analysis failed for '{}': {}",
            style("✗").red(),
            term,
            style(reason).dim()
        );
    }

    Ok(())
}

fn print_summary(results: &[(String, SearchOutcome)]) {
    for (term, outcome) in results {
        println!("\n{}", style(format!("\"{}\"", term)).bold());

        if let Some(ref error) = outcome.error {
            println!("  {} {}", style("✗").red(), error);
            continue;
        }

        if outcome.has_matches() {
            println!(
                "  {} {} match(es)",
                style("✓").green(),
                outcome.matches.len()
            );
            for record in &outcome.matches {
                let label = record.location_label();
                let label = if label.is_empty() {
                    String::new()
                } else {
                    format!("[{}] ", label)
                };
                println!("    {}{}", style(label).cyan(), truncate(&record.text(), 100));
            }
        } else {
            println!("  {} no matches", style("✗").red());
        }

        if outcome.search_interrupted && outcome.has_matches() {
            println!(
                "  {}",
                style("Not found at every location (see --json for details)").dim()
            );
        }
    }
    println!();
}
