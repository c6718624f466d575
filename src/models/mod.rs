//! Data models for catalog-scout.

mod product;

pub use product::{ProductAnalysis, ProductField, ProductRecord, ProductTexts};
