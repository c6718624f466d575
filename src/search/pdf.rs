//! Multi-backend keyword search over PDF pages.
//!
//! Every configured backend reads every page. A term is found on a page when
//! any backend's text contains it, and each backend that saw it contributes
//! its full page text to the page record. Recall over precision: the merged
//! text is line-deduplicated afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};
use tracing::{debug, warn};

use super::types::{Location, MatchRecord, MissingTerms, PageError, SearchError, SearchOutcome};
use crate::config::ExtractionConfig;
use crate::ocr::{build_extractors, BackendKind, PageExtractor, PdfPage};
use crate::utils::{clean_lines, dedupe};

/// Page lookup over a document's page tree.
pub trait PageTree {
    fn page_count(&self) -> u32;

    /// Resolve the page at a 0-based index.
    fn page(&self, index: u32) -> Result<PdfPage, PageError>;
}

/// A PDF opened through both handles: its path for the command-line tools
/// and an in-memory lopdf page tree.
pub struct PdfDocument {
    path: PathBuf,
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, SearchError> {
        let document = Document::load(path)?;
        let pages = document.get_pages();
        debug!("Opened {} ({} pages)", path.display(), pages.len());
        Ok(Self {
            path: path.to_path_buf(),
            document,
            pages,
        })
    }

    /// Backends for this document in configured order.
    pub fn extractors(&self, config: &ExtractionConfig) -> Vec<Box<dyn PageExtractor + '_>> {
        build_extractors(config, &self.path, &self.document)
    }
}

impl PageTree for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, index: u32) -> Result<PdfPage, PageError> {
        // lopdf numbers pages from 1
        self.pages
            .get(&(index + 1))
            .map(|&object_id| PdfPage { index, object_id })
            .ok_or(PageError::NotInTree(index + 1))
    }
}

/// One page as every backend read it.
#[derive(Debug, Clone)]
pub struct PageText {
    page: PdfPage,
    backends: Vec<BackendText>,
}

#[derive(Debug, Clone)]
struct BackendText {
    kind: BackendKind,
    text: String,
    folded: String,
}

impl PageText {
    /// 1-based page number.
    pub fn number(&self) -> u32 {
        self.page.number()
    }
}

/// Run every backend once over every page of `tree`.
///
/// Unresolvable pages are logged and left out; a failing backend
/// contributes empty text for that page.
pub fn extract_pages<T: PageTree + ?Sized>(
    tree: &T,
    extractors: &[Box<dyn PageExtractor + '_>],
) -> Vec<PageText> {
    let mut pages = Vec::new();
    for index in 0..tree.page_count() {
        let page = match tree.page(index) {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping page {}: {}", index + 1, e);
                continue;
            }
        };

        let backends = extractors
            .iter()
            .map(|extractor| {
                let text = extractor.extract(&page).unwrap_or_else(|e| {
                    warn!(
                        "{} failed on page {}: {}",
                        extractor.kind(),
                        page.number(),
                        e
                    );
                    String::new()
                });
                BackendText {
                    kind: extractor.kind(),
                    folded: text.to_lowercase(),
                    text,
                }
            })
            .collect();
        pages.push(PageText { page, backends });
    }
    debug!("Extracted {} pages with {} backends", pages.len(), extractors.len());
    pages
}

/// Search every page of `tree` for the given terms.
pub fn search_pdf<T: PageTree + ?Sized>(
    tree: &T,
    extractors: &[Box<dyn PageExtractor + '_>],
    terms: &[String],
) -> SearchOutcome {
    search_pages(&extract_pages(tree, extractors), terms)
}

/// Search already extracted pages for the given terms.
pub fn search_pages(pages: &[PageText], terms: &[String]) -> SearchOutcome {
    let terms: Vec<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    let mut matches = Vec::new();
    let mut missing: BTreeMap<Location, Vec<String>> = BTreeMap::new();

    for page in pages {
        let (record, page_missing) = scan_page(page, &terms);
        if let Some(record) = record {
            matches.push(record);
        }
        if !page_missing.is_empty() {
            missing.insert(Location::Page(page.number()), page_missing);
        }
    }

    debug!(
        "PDF search {:?}: {} matching pages, {} pages with missing terms",
        terms,
        matches.len(),
        missing.len()
    );
    SearchOutcome::new(matches, MissingTerms::ByLocation(missing))
}

/// Fold the terms over one page: the page record, if any, and the terms
/// no backend saw.
fn scan_page(page: &PageText, terms: &[&str]) -> (Option<MatchRecord>, Vec<String>) {
    let (buffer, missing) = terms.iter().fold(
        (String::new(), Vec::new()),
        |(buffer, mut missing), term| {
            let needle = term.to_lowercase();
            let hits: String = page
                .backends
                .iter()
                .filter(|backend| backend.folded.contains(&needle))
                .map(|backend| format!("{}:\n{}\n\n", backend.kind, backend.text))
                .collect();
            if hits.is_empty() {
                missing.push(term.to_string());
            }
            (buffer + &hits, missing)
        },
    );

    let record = (!buffer.is_empty()).then(|| MatchRecord::Page {
        page_number: page.number(),
        combined_text: clean_lines(&buffer),
    });
    (record, dedupe(missing))
}
