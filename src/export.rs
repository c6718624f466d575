//! Spreadsheet export of stored products and raw search results.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::info;

use crate::models::{ProductField, ProductRecord};
use crate::search::SearchOutcome;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("Nothing to export")]
    Empty,
}

/// Write one row per product with every stored column.
pub fn write_products(path: &Path, records: &[ProductRecord]) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Products")?;
    let headers: Vec<&str> = std::iter::once("Search term")
        .chain(ProductField::ALL.iter().map(ProductField::label))
        .collect();
    write_header(sheet, &headers)?;

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &record.search_term)?;
        for (col, field) in ProductField::ALL.iter().enumerate() {
            sheet.write_string(row, col as u16 + 1, record.field(*field))?;
        }
    }

    workbook.save(path)?;
    info!("Exported {} products to {}", records.len(), path.display());
    Ok(())
}

/// Flatten search results to `(term, location, text)` rows.
pub fn write_search_results(
    path: &Path,
    results: &[(String, SearchOutcome)],
) -> Result<(), ExportError> {
    let rows: Vec<[String; 3]> = results
        .iter()
        .flat_map(|(term, outcome)| {
            outcome
                .matches
                .iter()
                .map(move |record| [term.clone(), record.location_label(), record.text()])
        })
        .collect();
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Search results")?;
    write_header(sheet, &["Term", "Location", "Text"])?;
    sheet.set_column_width(2, 80)?;

    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(i as u32 + 1, col as u16, value)?;
        }
    }

    workbook.save(path)?;
    info!("Exported {} result rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    Ok(())
}
