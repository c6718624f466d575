//! Repository layer for the local product store.

mod products;

use thiserror::Error;

pub use products::ProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
