//! Filesystem page store
//!
//! Pages are laid out as `{output_dir}/{depth}/{sanitized url}.html`. There
//! is no manifest; the directory tree is the only record of a crawl.

use crate::storage::{StorageError, StorageResult};
use crate::url::html_file_name;
use std::path::PathBuf;

/// Writes fetched pages under a root output directory
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a store rooted at `root`
    ///
    /// Nothing is created on disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derives the storage key for a page
    pub fn storage_path(&self, url: &str, depth: u32) -> PathBuf {
        self.root.join(depth.to_string()).join(html_file_name(url))
    }

    /// Writes page bytes to their storage path, creating parent directories
    ///
    /// Directory creation is idempotent, so sibling tasks racing to create the
    /// same depth directory do not fail each other.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the page was written
    /// * `Err(StorageError)` - Directory creation or the write failed
    pub async fn write_page(&self, url: &str, depth: u32, body: &[u8]) -> StorageResult<PathBuf> {
        let path = self.storage_path(url, depth);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, body)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}
