//! OCR backend: rasterize a page with pdftoppm, read it with Tesseract.
//!
//! Scanned PDFs carry no text layer at all, so this is the only backend that
//! sees their content.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tempfile::TempDir;
use tracing::debug;

use super::backend::{BackendKind, ExtractionError, PageExtractor, PdfPage};
use super::tools::{check_cmd_status, handle_cmd_output};

/// Tesseract OCR backend bound to the PDF's path.
pub struct TesseractExtractor<'a> {
    path: &'a Path,
    language: String,
    dpi: u32,
}

impl<'a> TesseractExtractor<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            language: "eng".to_string(),
            dpi: 300,
        }
    }

    /// Set Tesseract language (e.g. "eng", "swe+eng").
    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = lang.to_string();
        self
    }

    /// Set rasterization resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Convert one page to a PNG inside `output_dir`.
    fn rasterize(&self, page: &PdfPage, output_dir: &Path) -> Result<PathBuf, ExtractionError> {
        let page_str = page.number().to_string();
        let dpi_str = self.dpi.to_string();
        let status = Command::new("pdftoppm")
            .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
            .arg(self.path)
            .arg(output_dir.join("page"))
            .status();

        check_cmd_status(
            status,
            "pdftoppm (install poppler-utils)",
            &format!("pdftoppm failed to convert page {}", page.number()),
        )?;

        find_page_image(output_dir, page.number()).ok_or_else(|| {
            ExtractionError::ExtractionFailed(format!(
                "No image generated for page {}",
                page.number()
            ))
        })
    }

    fn run_tesseract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        handle_cmd_output(output, "tesseract (install tesseract-ocr)", "tesseract failed")
    }
}

/// Find the image pdftoppm wrote for a page.
///
/// pdftoppm zero-pads the page number to the width of the document's page
/// count: page-1.png, page-01.png, page-001.png...
fn find_page_image(dir: &Path, page_num: u32) -> Option<PathBuf> {
    (1..=4)
        .map(|digits| dir.join(format!("page-{:0width$}.png", page_num, width = digits)))
        .find(|path| path.exists())
}

impl PageExtractor for TesseractExtractor<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Tesseract
    }

    fn extract(&self, page: &PdfPage) -> Result<String, ExtractionError> {
        let start = Instant::now();

        // The raster lives only as long as this call.
        let temp_dir = TempDir::new()?;
        let image_path = self.rasterize(page, temp_dir.path())?;
        let text = self.run_tesseract(&image_path)?;

        debug!(
            "tesseract read page {} in {}ms",
            page.number(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}
