//! Keyword search over spreadsheets, Word documents and PDFs.
//!
//! Spreadsheets match whole words after normalization; Word documents and
//! PDFs match case-insensitive substrings. Every searcher returns a
//! [`SearchOutcome`] and never fails: file-level errors become failed
//! outcomes, backend and page errors are logged and skipped.

mod orchestrator;
mod pdf;
mod spreadsheet;
mod types;
mod word;

pub use orchestrator::{analysis_text, search_file, split_terms};
pub use pdf::{extract_pages, search_pages, search_pdf, PageText, PageTree, PdfDocument};
pub use spreadsheet::{search_sheet, Sheet};
pub use types::{Location, MatchRecord, MissingTerms, PageError, SearchError, SearchOutcome};
pub use word::{search_word, WordDocument};
