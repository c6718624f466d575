//! catalog-scout: keyword search over product spreadsheets, PDFs and Word
//! documents, with language-model enrichment into a local product store.

pub mod cli;
pub mod config;
pub mod export;
pub mod import;
pub mod llm;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod repository;
pub mod search;
pub mod utils;
