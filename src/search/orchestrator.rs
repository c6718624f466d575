//! Per-file dispatch: pick the searcher for a file and run it once per term.

use std::path::Path;

use tracing::{info, warn};

use super::pdf::{extract_pages, search_pages, PdfDocument};
use super::spreadsheet::{search_sheet, Sheet};
use super::types::{MatchRecord, SearchError, SearchOutcome};
use super::word::{search_word, WordDocument};
use crate::config::ExtractionConfig;
use crate::utils::{extension_of, DocumentKind};

/// Split a comma-separated term list, trimming and dropping empty entries.
pub fn split_terms(terms_csv: &str) -> Vec<String> {
    terms_csv
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Search one file for every term in `terms_csv`.
///
/// The document is opened once and searched once per term, so each term
/// gets its own outcome. PDF pages are extracted once for all terms. Pairs come back in input order. A file that cannot
/// be opened, or has an unknown extension, yields a failed outcome per term.
pub fn search_file(
    path: &Path,
    terms_csv: &str,
    extraction: &ExtractionConfig,
) -> Vec<(String, SearchOutcome)> {
    let terms = split_terms(terms_csv);
    if terms.is_empty() {
        warn!("No search terms given for {}", path.display());
        return Vec::new();
    }

    let Some(kind) = DocumentKind::from_path(path) else {
        let error = SearchError::UnsupportedExtension(extension_of(path));
        warn!("{}: {}", path.display(), error);
        return fail_all(None, &terms, &error);
    };

    info!(
        "Searching {} ({}) for {} terms",
        path.display(),
        kind,
        terms.len()
    );

    let result = match kind {
        DocumentKind::Spreadsheet => Sheet::open(path).map(|sheet| {
            each_term(&terms, |term| search_sheet(&sheet, term))
        }),
        DocumentKind::Word => WordDocument::open(path).map(|document| {
            each_term(&terms, |term| search_word(&document, &[term.to_string()]))
        }),
        DocumentKind::Pdf => PdfDocument::open(path).map(|document| {
            // Backends read each page once; every term folds over those texts
            let pages = extract_pages(&document, &document.extractors(extraction));
            each_term(&terms, |term| search_pages(&pages, &[term.to_string()]))
        }),
    };

    result.unwrap_or_else(|error| {
        warn!("Cannot search {}: {}", path.display(), error);
        fail_all(Some(kind), &terms, &error)
    })
}

fn each_term(
    terms: &[String],
    search: impl Fn(&str) -> SearchOutcome,
) -> Vec<(String, SearchOutcome)> {
    terms
        .iter()
        .map(|term| (term.clone(), search(term)))
        .collect()
}

fn fail_all(
    kind: Option<DocumentKind>,
    terms: &[String],
    error: &SearchError,
) -> Vec<(String, SearchOutcome)> {
    terms
        .iter()
        .map(|term| {
            (
                term.clone(),
                SearchOutcome::failed(kind, std::slice::from_ref(term), error),
            )
        })
        .collect()
}

/// Render an outcome's matches as plain text for the language model.
pub fn analysis_text(outcome: &SearchOutcome) -> String {
    outcome
        .matches
        .iter()
        .map(|record| match record {
            MatchRecord::Row { values } => values.join(", "),
            MatchRecord::Passage { location, text } => format!("--- {} ---\n{}", location, text),
            MatchRecord::Page {
                page_number,
                combined_text,
            } => format!("--- Page {} ---\n{}", page_number, combined_text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Location, MissingTerms};

    #[test]
    fn test_split_terms() {
        assert_eq!(
            split_terms(" red, ,Backpack ,,x200"),
            vec!["red", "Backpack", "x200"]
        );
        assert!(split_terms(" , ").is_empty());
    }

    #[test]
    fn test_unknown_extension_fails_every_term() {
        let results = search_file(
            Path::new("catalog.txt"),
            "a, b",
            &ExtractionConfig::default(),
        );

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "a");
        for (term, outcome) in &results {
            assert!(outcome.matches.is_empty());
            assert!(outcome.search_interrupted);
            assert!(outcome.keywords_not_found.contains(term));
            assert!(outcome.error.as_deref().unwrap().contains("txt"));
        }
    }

    #[test]
    fn test_unreadable_pdf_marks_document_sentinel() {
        let results = search_file(
            Path::new("/nonexistent/catalog.pdf"),
            "x200",
            &ExtractionConfig::default(),
        );

        let (_, outcome) = &results[0];
        assert_eq!(
            outcome.keywords_not_found.at(Location::Document),
            &["x200".to_string()][..]
        );
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_unreadable_spreadsheet_lists_term() {
        let results = search_file(
            Path::new("/nonexistent/catalog.XLSX"),
            "jacket",
            &ExtractionConfig::default(),
        );
        assert_eq!(
            results[0].1.keywords_not_found,
            MissingTerms::Terms(vec!["jacket".to_string()])
        );
    }

    #[test]
    fn test_analysis_text_formats() {
        let outcome = SearchOutcome::new(
            vec![
                MatchRecord::Row {
                    values: vec!["Red Jacket".to_string(), "M".to_string()],
                },
                MatchRecord::Passage {
                    location: Location::Table(2),
                    text: "Red".to_string(),
                },
                MatchRecord::Page {
                    page_number: 3,
                    combined_text: "pdftotext:\nX200".to_string(),
                },
            ],
            MissingTerms::Terms(vec![]),
        );

        assert_eq!(
            analysis_text(&outcome),
            "Red Jacket, M\n--- table_2 ---\nRed\n--- Page 3 ---\npdftotext:\nX200"
        );
    }
}
