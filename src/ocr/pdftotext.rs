//! Direct text-layer extraction through Poppler's pdftotext.

use std::path::Path;
use std::process::Command;

use super::backend::{BackendKind, ExtractionError, PageExtractor, PdfPage};
use super::tools::handle_cmd_output;

/// Text layer backend bound to the PDF's path.
pub struct PdftotextExtractor<'a> {
    path: &'a Path,
}

impl<'a> PdftotextExtractor<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }
}

impl PageExtractor for PdftotextExtractor<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Pdftotext
    }

    fn extract(&self, page: &PdfPage) -> Result<String, ExtractionError> {
        let page_str = page.number().to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(self.path)
            .arg("-") // Output to stdout
            .output();

        handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page.number()),
        )
    }
}
