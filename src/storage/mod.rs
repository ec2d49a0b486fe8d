//! Storage module for persisting fetched pages
//!
//! This module handles writing page bytes to disk under a path derived
//! from the page URL and its crawl depth.

mod filesystem;

pub use filesystem::FsStorage;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
