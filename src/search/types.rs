//! Result types shared by the document searchers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::utils::DocumentKind;

/// File-level failures. Searchers turn these into failed outcomes.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Unsupported file type: '{0}'")]
    UnsupportedExtension(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Word document error: {0}")]
    Word(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to scan a single PDF page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page {0} is not in the page tree")]
    NotInTree(u32),
}

/// Where in a document a match or a missing term was recorded.
///
/// Ordering puts paragraphs before tables, pages after both, and the
/// whole-document sentinel last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    /// 1-based paragraph index.
    Paragraph(usize),
    /// 1-based table index.
    Table(usize),
    /// 1-based page number.
    Page(u32),
    /// The file as a whole (it could not be read).
    Document,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Paragraph(n) => write!(f, "{}", n),
            Location::Table(n) => write!(f, "table_{}", n),
            Location::Page(n) => write!(f, "{}", n),
            Location::Document => write!(f, "document"),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One located occurrence of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchRecord {
    /// Original non-empty cell values of a matching spreadsheet row.
    Row { values: Vec<String> },
    /// A matching paragraph, or the matching cells of a table.
    Passage { location: Location, text: String },
    /// Merged backend text of a matching PDF page.
    Page {
        page_number: u32,
        combined_text: String,
    },
}

impl MatchRecord {
    /// Location label for tabular output; rows have none.
    pub fn location_label(&self) -> String {
        match self {
            MatchRecord::Row { .. } => String::new(),
            MatchRecord::Passage { location, .. } => location.to_string(),
            MatchRecord::Page { page_number, .. } => Location::Page(*page_number).to_string(),
        }
    }

    /// The record's text content.
    pub fn text(&self) -> String {
        match self {
            MatchRecord::Row { values } => values.join(", "),
            MatchRecord::Passage { text, .. } => text.clone(),
            MatchRecord::Page { combined_text, .. } => combined_text.clone(),
        }
    }
}

/// Terms that were not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MissingTerms {
    /// Spreadsheet searches: at most the queried term.
    Terms(Vec<String>),
    /// Word and PDF searches: missing terms per location.
    ByLocation(BTreeMap<Location, Vec<String>>),
}

impl MissingTerms {
    pub fn is_empty(&self) -> bool {
        match self {
            MissingTerms::Terms(terms) => terms.is_empty(),
            MissingTerms::ByLocation(map) => map.values().all(Vec::is_empty),
        }
    }

    /// Whether `term` is recorded missing anywhere.
    pub fn contains(&self, term: &str) -> bool {
        match self {
            MissingTerms::Terms(terms) => terms.iter().any(|t| t == term),
            MissingTerms::ByLocation(map) => map.values().flatten().any(|t| t == term),
        }
    }

    /// Missing terms recorded at one location.
    pub fn at(&self, location: Location) -> &[String] {
        match self {
            MissingTerms::Terms(_) => &[],
            MissingTerms::ByLocation(map) => map.get(&location).map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

/// Result of searching one document for one or more terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub matches: Vec<MatchRecord>,
    pub keywords_not_found: MissingTerms,
    /// True iff some requested term is in `keywords_not_found`.
    pub search_interrupted: bool,
    /// Set when the whole file could not be searched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    /// Build an outcome, deriving the interruption flag from `missing`.
    pub fn new(matches: Vec<MatchRecord>, missing: MissingTerms) -> Self {
        Self {
            search_interrupted: !missing.is_empty(),
            matches,
            keywords_not_found: missing,
            error: None,
        }
    }

    /// Outcome for a file that could not be searched at all.
    ///
    /// Every term is missing: as a plain list for spreadsheets, under
    /// [`Location::Document`] otherwise.
    pub fn failed(kind: Option<DocumentKind>, terms: &[String], error: impl fmt::Display) -> Self {
        let terms = terms.to_vec();
        let missing = match kind {
            Some(DocumentKind::Spreadsheet) => MissingTerms::Terms(terms),
            _ => MissingTerms::ByLocation(BTreeMap::from([(Location::Document, terms)])),
        };
        Self {
            error: Some(error.to_string()),
            ..Self::new(Vec::new(), missing)
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_order_and_display() {
        let mut locations = vec![
            Location::Document,
            Location::Table(1),
            Location::Paragraph(10),
            Location::Paragraph(2),
        ];
        locations.sort();
        assert_eq!(
            locations,
            vec![
                Location::Paragraph(2),
                Location::Paragraph(10),
                Location::Table(1),
                Location::Document
            ]
        );
        assert_eq!(Location::Table(3).to_string(), "table_3");
        assert_eq!(Location::Page(4).to_string(), "4");
    }

    #[test]
    fn test_failed_outcome_is_interrupted() {
        let terms = vec!["a".to_string(), "b".to_string()];
        let outcome = SearchOutcome::failed(Some(DocumentKind::Pdf), &terms, "broken");

        assert!(outcome.search_interrupted);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.keywords_not_found.at(Location::Document), &terms[..]);
        assert_eq!(outcome.error.as_deref(), Some("broken"));
    }

    #[test]
    fn test_failed_spreadsheet_lists_terms() {
        let terms = vec!["a".to_string()];
        let outcome = SearchOutcome::failed(Some(DocumentKind::Spreadsheet), &terms, "x");
        assert_eq!(outcome.keywords_not_found, MissingTerms::Terms(terms));
    }

    #[test]
    fn test_empty_location_lists_are_not_missing() {
        let missing = MissingTerms::ByLocation(BTreeMap::from([(Location::Page(1), vec![])]));
        assert!(missing.is_empty());
        assert!(!SearchOutcome::new(Vec::new(), missing).search_interrupted);
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = SearchOutcome::new(
            vec![MatchRecord::Passage {
                location: Location::Table(1),
                text: "Red".to_string(),
            }],
            MissingTerms::ByLocation(BTreeMap::from([(
                Location::Table(1),
                vec!["backpack".to_string()],
            )])),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["matches"][0]["kind"], "passage");
        assert_eq!(json["matches"][0]["location"], "table_1");
        assert_eq!(json["keywords_not_found"]["table_1"][0], "backpack");
        assert_eq!(json["search_interrupted"], true);
        assert!(json.get("error").is_none());
    }
}
