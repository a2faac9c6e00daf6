//! Capabilities the cleaner needs from its host.
//!
//! The cleaner owns no cache of its own. Everything it does to the cache goes
//! through these traits, which keeps the decision and clear logic free of I/O
//! and lets tests drive it with [`MockHost`](crate::testkit::MockHost).
//!
//! # Example
//!
//! ```rust,ignore
//! use cache_cleaner::host::{HostEnv, StatsGateway};
//!
//! async fn report<H: HostEnv>(host: &H) {
//!     if let Ok(stats) = host.cache_stats().await {
//!         println!("{:.2} MB", stats.current_size_mb);
//!     }
//! }
//! ```

pub mod console;
pub mod directory;

pub use console::{ConsoleNotifier, ConsoleRenderer, LocalHost, StaticMenu};
pub use directory::DirectoryCache;

use crate::errors::Result;
use std::time::Duration;

/// Snapshot of the cache size. Has no identity beyond the moment of the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub current_size_mb: f64,
}

/// Reports the current cache size.
#[allow(async_fn_in_trait)]
pub trait StatsGateway {
    /// # Errors
    ///
    /// Returns `Error::StatsUnavailable` when the host cannot measure the cache.
    async fn cache_stats(&self) -> Result<CacheStats>;
}

/// Deletes every cache entry the host does not hold a lock on.
#[allow(async_fn_in_trait)]
pub trait ClearGateway {
    /// Success only means deletion was started; the reported size may
    /// lag behind.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeleteFailed` when deletion could not be started.
    async fn delete_unlocked_items(&self) -> Result<()>;
}

/// A user-visible, best-effort message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    /// How long the host should show it; `None` uses the host default
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            duration: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Shows notifications. Fire-and-forget: there is no completion contract.
pub trait Notifier {
    fn show_notification(&self, notification: Notification);
}

/// What a menu entry opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenSettings,
}

/// The host's menu system.
pub trait MenuRegistry {
    /// # Errors
    ///
    /// Returns `Error::Host` when the host rejects the entry.
    fn register_entry(&mut self, title: &str, action: MenuAction) -> Result<()>;
}

/// Everything the clear cycle and the startup decision touch.
pub trait HostEnv: StatsGateway + ClearGateway + Notifier {}

impl<T: StatsGateway + ClearGateway + Notifier> HostEnv for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_builders() {
        let info = Notification::info("done");
        assert!(!info.is_error);
        assert_eq!(info.duration, None);

        let error = Notification::error("boom").with_duration(Duration::from_secs(10));
        assert!(error.is_error);
        assert_eq!(error.duration, Some(Duration::from_secs(10)));
    }
}
