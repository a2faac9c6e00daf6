//! Shared error types for cache-cleaner operations.
//!
//! Host failures (`StatsUnavailable`, `DeleteFailed`) are never fatal: the
//! clear and decision paths turn them into a notification plus an outcome
//! value. Storage errors surface from [`SettingsStore::save`] so callers can
//! keep their in-memory state authoritative.
//!
//! [`SettingsStore::save`]: crate::config::SettingsStore::save

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cache-cleaner operations
#[derive(Debug, Error)]
pub enum Error {
    /// The host could not report the cache size
    #[error("Cache stats unavailable: {message}")]
    StatsUnavailable { message: String },

    /// The host could not start deleting cache entries
    #[error("Cache deletion failed: {message}")]
    DeleteFailed {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A stored threshold was not a finite, non-negative number
    #[error("Invalid threshold value: {0}")]
    InvalidThreshold(f64),

    /// Settings backend failures
    #[error("Settings storage error: {message}")]
    Storage {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Runtime configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rendering or menu failures reported by the host
    #[error("Host error: {0}")]
    Host(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a stats error
    pub fn stats(message: impl Into<String>) -> Self {
        Self::StatsUnavailable {
            message: message.into(),
        }
    }

    /// Create a deletion error without path context
    pub fn delete(message: impl Into<String>) -> Self {
        Self::DeleteFailed {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create a deletion error for a specific path
    pub fn delete_at(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::DeleteFailed {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a storage error without path context
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create a storage error for a specific path
    pub fn storage_at(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
