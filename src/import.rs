//! Spreadsheet import into the product store.
//!
//! The first worksheet's header row names the columns, either as database
//! column names (`product_name`) or export headers (`Product name`). Rows are
//! merged by search term: listed columns are overwritten, the rest of a
//! stored product is left alone.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::ProductField;
use crate::repository::{ProductRepository, RepositoryError};
use crate::search::{SearchError, Sheet};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Cannot read spreadsheet: {0}")]
    Read(#[from] SearchError),

    #[error("No search term column in header")]
    MissingTermColumn,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One spreadsheet row destined for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedProduct {
    pub search_term: String,
    pub values: Vec<(ProductField, String)>,
}

/// What an import did to the store.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub updated: usize,
    /// Data rows without a search term.
    pub skipped: usize,
}

/// Map a sheet's rows to products. Unknown columns are ignored.
pub fn products_from_sheet(sheet: &Sheet) -> Result<Vec<ImportedProduct>, ImportError> {
    let term_column = sheet
        .columns
        .iter()
        .position(|name| is_term_column(name))
        .ok_or(ImportError::MissingTermColumn)?;

    let fields: Vec<(usize, ProductField)> = sheet
        .columns
        .iter()
        .enumerate()
        .filter_map(|(i, name)| match ProductField::from_name(name) {
            Some(field) => Some((i, field)),
            None => {
                if i != term_column {
                    debug!("Ignoring column '{}'", name);
                }
                None
            }
        })
        .collect();

    Ok(sheet
        .rows
        .iter()
        .map(|row| {
            let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or_default();
            ImportedProduct {
                search_term: cell(term_column).to_string(),
                values: fields
                    .iter()
                    .map(|&(i, field)| (field, cell(i).to_string()))
                    .collect(),
            }
        })
        .collect())
}

fn is_term_column(name: &str) -> bool {
    let key: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    key == "searchterm"
}

/// Read `path` and merge its rows into `repo`.
pub fn import_file(path: &Path, repo: &ProductRepository) -> Result<ImportReport, ImportError> {
    let sheet = Sheet::open(path)?;
    let products = products_from_sheet(&sheet)?;

    let mut report = ImportReport::default();
    for product in &products {
        if product.search_term.is_empty() {
            report.skipped += 1;
            continue;
        }
        if repo.set_fields(&product.search_term, &product.values)? {
            report.inserted += 1;
        } else {
            report.updated += 1;
        }
    }

    info!(
        "Imported {}: {} inserted, {} updated, {} skipped",
        path.display(),
        report.inserted,
        report.updated,
        report.skipped
    );
    Ok(report)
}
