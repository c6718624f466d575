//! Language model integration for product analysis and copywriting.

mod client;
mod config;
mod parse;
pub mod prompts;

pub use client::{Analyzer, LlmClient, LlmError};
pub use config::LlmConfig;
pub use parse::{parse_analysis, split_product_texts};
