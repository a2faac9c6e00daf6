//! A cache directory on local disk acting as the host cache.
//!
//! Entries are regular files. A file is *locked* while a sibling
//! `<name>.lock` file exists; lock files themselves are never deleted.

use super::{CacheStats, ClearGateway, StatsGateway};
use crate::errors::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const LOCK_EXTENSION: &str = "lock";

#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total size of all files under the root, in bytes. A missing root is empty.
    pub fn size_bytes(&self) -> Result<u64> {
        if !self.root.exists() {
            return Ok(0);
        }

        WalkDir::new(&self.root)
            .into_iter()
            .try_fold(0u64, |total, entry| -> Result<u64> {
                let entry = entry.map_err(|e| Error::stats(format!("Failed to walk cache: {}", e)))?;
                if !entry.file_type().is_file() {
                    return Ok(total);
                }
                let metadata = entry.metadata().map_err(|e| {
                    Error::stats(format!(
                        "Failed to stat {}: {}",
                        entry.path().display(),
                        e
                    ))
                })?;
                Ok(total.saturating_add(metadata.len()))
            })
    }

    /// Delete every unlocked file and prune directories left empty.
    /// Returns the number of files removed.
    pub fn purge_unlocked(&self) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut removed = 0usize;
        for entry in WalkDir::new(&self.root).contents_first(true) {
            let entry = entry.map_err(|e| Error::delete(format!("Failed to walk cache: {}", e)))?;
            let path = entry.path();

            if entry.file_type().is_file() {
                if is_locked(path) {
                    tracing::debug!(path = %path.display(), "Skipping locked cache entry");
                    continue;
                }
                fs::remove_file(path)
                    .map_err(|e| Error::delete_at("Failed to remove cache entry", path, e))?;
                removed += 1;
            } else if entry.file_type().is_dir() && entry.depth() > 0 && is_empty_dir(path)? {
                fs::remove_dir(path)
                    .map_err(|e| Error::delete_at("Failed to remove cache directory", path, e))?;
            }
        }

        tracing::debug!(root = %self.root.display(), removed, "Purged unlocked cache entries");
        Ok(removed)
    }
}

fn is_lock_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOCK_EXTENSION)
}

fn lock_path_for(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    Some(path.with_file_name(format!("{}.{}", name, LOCK_EXTENSION)))
}

fn is_locked(path: &Path) -> bool {
    is_lock_file(path) || lock_path_for(path).is_some_and(|lock| lock.exists())
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path)
        .map_err(|e| Error::delete_at("Failed to read cache directory", path, e))?;
    Ok(entries.next().is_none())
}

impl StatsGateway for DirectoryCache {
    async fn cache_stats(&self) -> Result<CacheStats> {
        let bytes = self.size_bytes()?;
        Ok(CacheStats {
            current_size_mb: bytes as f64 / BYTES_PER_MB,
        })
    }
}

impl ClearGateway for DirectoryCache {
    async fn delete_unlocked_items(&self) -> Result<()> {
        self.purge_unlocked().map(|_| ())
    }
}
