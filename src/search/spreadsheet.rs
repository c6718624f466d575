//! Whole-word keyword search over spreadsheet rows.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use tracing::{debug, warn};

use super::types::{MatchRecord, MissingTerms, SearchError, SearchOutcome};
use crate::utils::{dedupe, normalize};

/// The first worksheet of a workbook, with every cell as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    /// Header row.
    pub columns: Vec<String>,
    /// Data rows, header excluded.
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Load the first worksheet; its first row becomes the header.
    pub fn open(path: &Path) -> Result<Self, SearchError> {
        let mut workbook = open_workbook_auto(path)?;
        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(SearchError::EmptyWorkbook)?;
        let range = workbook.worksheet_range(&name)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
        let columns = rows.next().unwrap_or_default();
        let rows: Vec<Vec<String>> = rows.collect();

        debug!(
            "Loaded sheet '{}' from {}: {} columns, {} rows",
            name,
            path.display(),
            columns.len(),
            rows.len()
        );
        Ok(Self { columns, rows })
    }
}

/// Render a cell the way it reads in the sheet: dates as timestamps, not serials.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        Data::DateTime(value) if value.is_duration() => value
            .as_duration()
            .map(format_duration)
            .unwrap_or_else(|| value.to_string()),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| value.to_string()),
        Data::DateTimeIso(text) => text
            .parse::<NaiveDateTime>()
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
            .unwrap_or_else(|_| text.to_string()),
        Data::DurationIso(text) => text.to_string(),
        _ => cell.to_string(),
    }
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Search every row of `sheet` for `term` as a whole word.
///
/// Cells and term are normalized before matching; a matching row contributes
/// its original non-empty values, deduplicated.
pub fn search_sheet(sheet: &Sheet, term: &str) -> SearchOutcome {
    let matches: Vec<MatchRecord> = match word_pattern(term) {
        Some(pattern) => sheet
            .rows
            .iter()
            .filter(|row| row_matches(&pattern, row))
            .map(|row| MatchRecord::Row {
                values: dedupe(
                    row.iter()
                        .map(|cell| cell.trim())
                        .filter(|cell| !cell.is_empty())
                        .map(String::from),
                ),
            })
            .collect(),
        None => Vec::new(),
    };

    debug!("Spreadsheet search '{}': {} matching rows", term, matches.len());
    let missing = if matches.is_empty() {
        vec![term.to_string()]
    } else {
        Vec::new()
    };
    SearchOutcome::new(matches, MissingTerms::Terms(missing))
}

/// `\b<term>\b` over the normalized term, or None if nothing is left to match.
fn word_pattern(term: &str) -> Option<Regex> {
    let normalized = normalize(term);
    if normalized.is_empty() {
        return None;
    }
    match Regex::new(&format!(r"\b{}\b", regex::escape(&normalized))) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!("Cannot build pattern for '{}': {}", term, e);
            None
        }
    }
}

fn row_matches(pattern: &Regex, row: &[String]) -> bool {
    let joined = row
        .iter()
        .map(|cell| normalize(cell))
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    pattern.is_match(&joined)
}
