//! Product repository backed by a local SQLite file.

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use super::Result;
use crate::models::{ProductAnalysis, ProductField, ProductRecord, ProductTexts};

const PRODUCT_COLUMNS: &str = "id, search_term, brand, product_name, product_no, headline, \
     short_text, long_text, bullet_points, weight, material, sustainability, dimensions, \
     color, other_info, created_at";

/// SQLite-backed product repository.
pub struct ProductRepository {
    conn: Connection,
}

impl ProductRepository {
    /// Open (or create) the store at `db_path` and ensure the schema exists.
    pub fn open(db_path: &Path) -> Result<Self> {
        debug!("Opening product store {}", db_path.display());
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        let repo = Self { conn };
        repo.init_schema()?;
        Ok(repo)
    }

    /// Create a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let repo = Self {
            conn: Connection::open_in_memory()?,
        };
        repo.init_schema()?;
        Ok(repo)
    }

    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                search_term TEXT NOT NULL,
                brand TEXT,
                product_name TEXT NOT NULL,
                product_no TEXT,
                headline TEXT,
                short_text TEXT,
                long_text TEXT,
                bullet_points TEXT,
                weight TEXT,
                material TEXT,
                sustainability TEXT,
                dimensions TEXT,
                color TEXT,
                other_info TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_products_search_term
                ON products(search_term);
        "#,
        )?;
        Ok(())
    }

    /// Update the row for `search_term` if one exists, else insert a new one.
    /// Returns true if a new row was inserted.
    pub fn upsert(&self, search_term: &str, analysis: &ProductAnalysis) -> Result<bool> {
        let bullets = analysis.bullet_text();
        let updated = self.conn.execute(
            r#"
            UPDATE products SET
                brand = ?2, product_name = ?3, product_no = ?4, headline = ?5,
                short_text = ?6, long_text = ?7, bullet_points = ?8, weight = ?9,
                material = ?10, sustainability = ?11, dimensions = ?12, color = ?13,
                other_info = ?14
            WHERE search_term = ?1
            "#,
            params![
                search_term,
                analysis.brand,
                analysis.product_name,
                analysis.product_no,
                analysis.headline,
                analysis.short_text,
                analysis.long_text,
                bullets,
                analysis.weight,
                analysis.material,
                analysis.sustainability,
                analysis.dimensions,
                analysis.color,
                analysis.other_info,
            ],
        )?;
        if updated > 0 {
            info!("Updated product '{}'", search_term);
            return Ok(false);
        }

        self.conn.execute(
            r#"
            INSERT INTO products (
                search_term, brand, product_name, product_no, headline, short_text,
                long_text, bullet_points, weight, material, sustainability, dimensions,
                color, other_info
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                search_term,
                analysis.brand,
                analysis.product_name,
                analysis.product_no,
                analysis.headline,
                analysis.short_text,
                analysis.long_text,
                bullets,
                analysis.weight,
                analysis.material,
                analysis.sustainability,
                analysis.dimensions,
                analysis.color,
                analysis.other_info,
            ],
        )?;
        info!("Inserted product '{}'", search_term);
        Ok(true)
    }

    /// Get the product stored under exactly this search term.
    pub fn get(&self, search_term: &str) -> Result<Option<ProductRecord>> {
        let sql = format!(
            "SELECT {} FROM products WHERE search_term = ?1 ORDER BY id LIMIT 1",
            PRODUCT_COLUMNS
        );
        let record = self
            .conn
            .query_row(&sql, params![search_term], row_to_product)
            .optional()?;
        Ok(record)
    }

    /// Get the first product whose search term contains `keyword`.
    pub fn find_like(&self, keyword: &str) -> Result<Option<ProductRecord>> {
        let sql = format!(
            "SELECT {} FROM products WHERE search_term LIKE ?1 ORDER BY id LIMIT 1",
            PRODUCT_COLUMNS
        );
        let pattern = format!("%{}%", keyword.trim());
        let record = self
            .conn
            .query_row(&sql, params![pattern], row_to_product)
            .optional()?;
        Ok(record)
    }

    /// Products with `keyword` in any text column, in insertion order.
    pub fn search(&self, keyword: &str) -> Result<Vec<ProductRecord>> {
        let conditions = std::iter::once("search_term")
            .chain(ProductField::ALL.iter().map(ProductField::column))
            .map(|column| format!("{} LIKE ?1", column))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT {} FROM products WHERE {} ORDER BY id",
            PRODUCT_COLUMNS, conditions
        );
        let pattern = format!("%{}%", keyword.trim());
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![pattern], row_to_product)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Store search '{}': {} products", keyword.trim(), records.len());
        Ok(records)
    }

    /// Set individual fields of the product stored under `search_term`,
    /// creating the product if it does not exist yet. Other fields keep
    /// their stored values. Returns true if a new row was inserted.
    pub fn set_fields(&self, search_term: &str, values: &[(ProductField, String)]) -> Result<bool> {
        if self.get(search_term)?.is_some() {
            if values.is_empty() {
                return Ok(false);
            }
            let assignments = values
                .iter()
                .enumerate()
                .map(|(i, (field, _))| format!("{} = ?{}", field.column(), i + 2))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE products SET {} WHERE search_term = ?1",
                assignments
            );
            let params = std::iter::once(search_term)
                .chain(values.iter().map(|(_, value)| value.as_str()));
            self.conn.execute(&sql, params_from_iter(params))?;
            info!("Updated {} field(s) of '{}'", values.len(), search_term);
            return Ok(false);
        }

        // product_name is NOT NULL; start it empty unless given
        let mut columns = vec!["search_term"];
        let mut row = vec![search_term];
        if !values.iter().any(|(field, _)| *field == ProductField::ProductName) {
            columns.push(ProductField::ProductName.column());
            row.push("");
        }
        for (field, value) in values {
            columns.push(field.column());
            row.push(value.as_str());
        }
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO products ({}) VALUES ({})",
            columns.join(", "),
            placeholders
        );
        self.conn.execute(&sql, params_from_iter(row))?;
        info!("Inserted product '{}'", search_term);
        Ok(true)
    }

    /// All products in insertion order.
    pub fn list(&self) -> Result<Vec<ProductRecord>> {
        let sql = format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], row_to_product)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Products for the given terms, in term order; unknown terms are skipped.
    pub fn fetch_for_terms(&self, terms: &[String]) -> Result<Vec<ProductRecord>> {
        let mut records = Vec::new();
        for term in terms {
            match self.get(term.trim())? {
                Some(record) => records.push(record),
                None => debug!("No stored product for '{}'", term.trim()),
            }
        }
        Ok(records)
    }

    /// Replace the marketing texts of a stored product.
    /// Returns false if no product has this search term.
    pub fn update_texts(&self, search_term: &str, texts: &ProductTexts) -> Result<bool> {
        let updated = self.conn.execute(
            r#"
            UPDATE products SET headline = ?2, short_text = ?3, long_text = ?4, bullet_points = ?5
            WHERE search_term = ?1
            "#,
            params![
                search_term,
                texts.headline,
                texts.short_text,
                texts.long_text,
                texts.bullet_points,
            ],
        )?;
        Ok(updated > 0)
    }
}

fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<ProductRecord> {
    // Nullable text columns read as empty strings
    let text = |name: &str| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(name)?.unwrap_or_default())
    };
    Ok(ProductRecord {
        id: row.get("id")?,
        search_term: text("search_term")?,
        brand: text("brand")?,
        product_name: text("product_name")?,
        product_no: text("product_no")?,
        headline: text("headline")?,
        short_text: text("short_text")?,
        long_text: text("long_text")?,
        bullet_points: text("bullet_points")?,
        weight: text("weight")?,
        material: text("material")?,
        sustainability: text("sustainability")?,
        dimensions: text("dimensions")?,
        color: text("color")?,
        other_info: text("other_info")?,
        created_at: row.get("created_at")?,
    })
}
