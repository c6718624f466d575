//! Page extraction backend abstraction.
//!
//! A PDF page is read through several independent backends:
//! - pdftotext: direct text layer via Poppler (primary handle, bound to the file path)
//! - tesseract: OCR over a rasterized rendering of the page
//! - lopdf: text layer decoded from the in-memory page tree (secondary handle)
//!
//! No single backend is reliable across all PDF generators, so the PDF
//! searcher runs every configured backend and unions what they return.

use thiserror::Error;

/// Errors from a single backend on a single page.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Page {0} not found")]
    PageMissing(u32),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Available extraction backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Poppler's pdftotext on the page's text layer.
    Pdftotext,
    /// pdftoppm rasterization followed by Tesseract OCR.
    Tesseract,
    /// Text layer decoded by lopdf.
    Lopdf,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Pdftotext => "pdftotext",
            BackendKind::Tesseract => "tesseract",
            BackendKind::Lopdf => "lopdf",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdftotext" | "poppler" => Some(BackendKind::Pdftotext),
            "tesseract" | "ocr" => Some(BackendKind::Tesseract),
            "lopdf" => Some(BackendKind::Lopdf),
            _ => None,
        }
    }

    /// External binaries this backend shells out to.
    pub fn required_tools(&self) -> &'static [&'static str] {
        match self {
            BackendKind::Pdftotext => &["pdftotext"],
            BackendKind::Tesseract => &["pdftoppm", "tesseract"],
            BackendKind::Lopdf => &[],
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A page resolved in the document's page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfPage {
    /// 0-based position in the document.
    pub index: u32,
    /// Object id of the page dictionary.
    pub object_id: lopdf::ObjectId,
}

impl PdfPage {
    /// 1-based page number, as reported to users and external tools.
    pub fn number(&self) -> u32 {
        self.index + 1
    }
}

/// One text-extraction strategy applied to a page.
pub trait PageExtractor {
    /// Which backend this is; its name heads the text it contributes.
    fn kind(&self) -> BackendKind;

    /// Extract the text of one page.
    fn extract(&self, page: &PdfPage) -> Result<String, ExtractionError>;
}
