//! Spreadsheet import command.

use std::path::Path;

use console::style;

use crate::cli::helpers::open_repository;
use crate::config::Settings;
use crate::import::import_file;

/// Merge a spreadsheet's products into the store.
pub fn cmd_import(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    println!("{} Importing {}", style("→").cyan(), file.display());

    let report = import_file(file, &repo)?;
    println!(
        "  {} inserted, {} updated, {} skipped (no search term)",
        style(report.inserted).green(),
        style(report.updated).cyan(),
        style(report.skipped).yellow()
    );
    Ok(())
}
