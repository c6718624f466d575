//! OCR and text extraction module.
//!
//! Extracts the text of single PDF pages using:
//! - pdftotext (Poppler) for the document's text layer
//! - Tesseract OCR over pages rasterized by pdftoppm
//! - lopdf for an independent decoding of the text layer
//!
//! Backends are plain strategies behind [`PageExtractor`]; the PDF searcher
//! runs them in the configured order and unions their output.

mod backend;
mod lopdf_text;
mod pdftotext;
mod tesseract;
mod tools;

use std::path::Path;

use tracing::debug;

use crate::config::ExtractionConfig;

pub use backend::{BackendKind, ExtractionError, PageExtractor, PdfPage};
pub use lopdf_text::LopdfExtractor;
pub use pdftotext::PdftotextExtractor;
pub use tesseract::TesseractExtractor;
pub use tools::{check_binary, check_tools};

/// Build the ordered backend list for one opened PDF.
///
/// `path` backs the command-line tools, `document` is the in-memory page
/// tree. Backends borrow both, so they cannot outlive the open document.
pub fn build_extractors<'a>(
    config: &ExtractionConfig,
    path: &'a Path,
    document: &'a lopdf::Document,
) -> Vec<Box<dyn PageExtractor + 'a>> {
    config
        .backends()
        .into_iter()
        .map(|kind| -> Box<dyn PageExtractor + 'a> {
            debug!("PDF extraction chain: added {} backend", kind);
            match kind {
                BackendKind::Pdftotext => Box::new(PdftotextExtractor::new(path)),
                BackendKind::Tesseract => Box::new(
                    TesseractExtractor::new(path)
                        .with_language(&config.tesseract_language)
                        .with_dpi(config.raster_dpi),
                ),
                BackendKind::Lopdf => Box::new(LopdfExtractor::new(document)),
            }
        })
        .collect()
}
