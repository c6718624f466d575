//! Shared utility functions.
//!
//! This module contains reusable utilities used across the codebase:
//! - `text`: normalization, deduplication and truncation
//! - `kind`: document kind detection from file extensions

mod kind;
mod text;

pub use kind::{extension_of, DocumentKind};
pub use text::{clean_lines, dedupe, normalize, truncate_chars};
