//! Substring keyword search over Word document paragraphs and tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::{Location, MatchRecord, MissingTerms, SearchError, SearchOutcome};
use crate::utils::dedupe;

/// Text content of a Word document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDocument {
    /// Top-level paragraphs in body order, including empty ones.
    pub paragraphs: Vec<String>,
    /// Tables as rows of cell texts.
    pub tables: Vec<Vec<Vec<String>>>,
}

impl WordDocument {
    /// Read a `.docx` file.
    pub fn open(path: &Path) -> Result<Self, SearchError> {
        let bytes = fs::read(path)?;
        let docx = docx_rs::read_docx(&bytes).map_err(|e| SearchError::Word(e.to_string()))?;

        let mut document = WordDocument::default();
        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => {
                    document.paragraphs.push(paragraph_text(p));
                }
                docx_rs::DocumentChild::Table(table) => {
                    document.tables.push(table_cells(table));
                }
                _ => {}
            }
        }

        debug!(
            "Loaded {}: {} paragraphs, {} tables",
            path.display(),
            document.paragraphs.len(),
            document.tables.len()
        );
        Ok(document)
    }
}

fn paragraph_text(p: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &p.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => run_text(run, &mut text),
            docx_rs::ParagraphChild::Hyperlink(hl) => {
                for run in &hl.children {
                    if let docx_rs::ParagraphChild::Run(r) = run {
                        run_text(r, &mut text);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn run_text(run: &docx_rs::Run, text: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => text.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn table_cells(table: &docx_rs::Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            let docx_rs::TableChild::TableRow(tr) = row;
            tr.cells
                .iter()
                .map(|cell| {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    // Cell paragraphs are newline-joined
                    tc.children
                        .iter()
                        .filter_map(|content| match content {
                            docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect()
        })
        .collect()
}

/// A search term paired with its case-folded form.
struct Needle<'a> {
    term: &'a str,
    folded: String,
}

impl Needle<'_> {
    fn found_in(&self, folded_text: &str) -> bool {
        folded_text.contains(&self.folded)
    }
}

/// Search paragraphs and tables for case-insensitive substrings.
///
/// A paragraph matching any term is recorded whole. A table contributes the
/// cells that matched, newline-joined. Terms missing at a location are
/// recorded there once each, in request order.
pub fn search_word(document: &WordDocument, terms: &[String]) -> SearchOutcome {
    let needles: Vec<Needle> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|term| Needle {
            term,
            folded: term.to_lowercase(),
        })
        .collect();

    let mut matches = Vec::new();
    let mut missing: BTreeMap<Location, Vec<String>> = BTreeMap::new();

    for (i, paragraph) in document.paragraphs.iter().enumerate() {
        let location = Location::Paragraph(i + 1);
        let folded = paragraph.to_lowercase();
        let (found, not_found): (Vec<&Needle>, Vec<&Needle>) =
            needles.iter().partition(|n| n.found_in(&folded));

        if !found.is_empty() {
            matches.push(MatchRecord::Passage {
                location,
                text: paragraph.clone(),
            });
        }
        record_missing(&mut missing, location, &not_found);
    }

    for (i, table) in document.tables.iter().enumerate() {
        let location = Location::Table(i + 1);
        let mut matched_cells = Vec::new();
        let mut found = vec![false; needles.len()];

        for cell in table.iter().flatten() {
            let folded = cell.to_lowercase();
            let mut cell_matched = false;
            for (needle, seen) in needles.iter().zip(found.iter_mut()) {
                if needle.found_in(&folded) {
                    *seen = true;
                    cell_matched = true;
                }
            }
            if cell_matched {
                matched_cells.push(cell.trim());
            }
        }

        if !matched_cells.is_empty() {
            matches.push(MatchRecord::Passage {
                location,
                text: matched_cells.join("\n"),
            });
        }
        let not_found: Vec<&Needle> = needles
            .iter()
            .zip(&found)
            .filter(|(_, seen)| !**seen)
            .map(|(needle, _)| needle)
            .collect();
        record_missing(&mut missing, location, &not_found);
    }

    debug!(
        "Word search {:?}: {} matches, {} locations with missing terms",
        terms,
        matches.len(),
        missing.len()
    );
    SearchOutcome::new(matches, MissingTerms::ByLocation(missing))
}

fn record_missing(
    missing: &mut BTreeMap<Location, Vec<String>>,
    location: Location,
    not_found: &[&Needle],
) {
    if not_found.is_empty() {
        return;
    }
    missing.insert(
        location,
        dedupe(not_found.iter().map(|n| n.term.to_string())),
    );
}
