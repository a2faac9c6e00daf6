//! Scripted host for testing clear cycles and the startup decision.
//!
//! [`MockHost`] implements every host capability in memory:
//! - [`StatsGateway`]: returns a scripted sequence of sizes
//! - [`ClearGateway`]: counts calls, optionally fails
//! - [`Notifier`]: records every notification
//! - [`MenuRegistry`] and [`PanelRenderer`]: record entries and views
//!
//! Clones share all state, so a test can hand a clone to the code under
//! test and inspect the original afterwards.

use crate::errors::{Error, Result};
use crate::host::{
    CacheStats, ClearGateway, MenuAction, MenuRegistry, Notification, Notifier, StatsGateway,
};
use crate::panel::{PanelRenderer, PanelView};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory host with scripted cache sizes.
///
/// # Example
///
/// ```rust,ignore
/// use cache_cleaner::testkit::MockHost;
///
/// // Initial size 100, then the delete shows up on the third check
/// let host = MockHost::new().with_sizes([100.0, 100.0, 100.0, 70.0]);
/// ```
#[derive(Clone, Default)]
pub struct MockHost {
    sizes: Arc<Mutex<VecDeque<f64>>>,
    fail_stats_from: Option<usize>,
    fail_delete: bool,
    fail_menu: bool,
    stats_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    menu_entries: Arc<Mutex<Vec<(String, MenuAction)>>>,
    views: Arc<Mutex<Vec<PanelView>>>,
}

impl MockHost {
    /// A host whose cache is always empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes returned by successive stats calls; the last one repeats.
    pub fn with_sizes(self, sizes: impl IntoIterator<Item = f64>) -> Self {
        *self.sizes.lock().expect("Lock poisoned") = sizes.into_iter().collect();
        self
    }

    /// Every stats call fails.
    pub fn with_stats_failure(self) -> Self {
        self.with_stats_failure_after(0)
    }

    /// Stats calls succeed `successes` times, then fail.
    pub fn with_stats_failure_after(mut self, successes: usize) -> Self {
        self.fail_stats_from = Some(successes);
        self
    }

    pub fn with_delete_failure(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn with_menu_failure(mut self) -> Self {
        self.fail_menu = true;
        self
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().expect("Lock poisoned").clone()
    }

    /// Just the notification texts, in order.
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }

    pub fn menu_entries(&self) -> Vec<(String, MenuAction)> {
        self.menu_entries.lock().expect("Lock poisoned").clone()
    }

    /// Every view rendered so far.
    pub fn views(&self) -> Vec<PanelView> {
        self.views.lock().expect("Lock poisoned").clone()
    }

    fn next_size(&self) -> f64 {
        let mut sizes = self.sizes.lock().expect("Lock poisoned");
        if sizes.len() > 1 {
            sizes.pop_front().unwrap_or_default()
        } else {
            sizes.front().copied().unwrap_or_default()
        }
    }
}

impl std::fmt::Debug for MockHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHost")
            .field("stats_calls", &self.stats_calls())
            .field("delete_calls", &self.delete_calls())
            .finish_non_exhaustive()
    }
}

impl StatsGateway for MockHost {
    async fn cache_stats(&self) -> Result<CacheStats> {
        let call = self.stats_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stats_from.is_some_and(|from| call >= from) {
            return Err(Error::stats("mock stats failure"));
        }
        Ok(CacheStats {
            current_size_mb: self.next_size(),
        })
    }
}

impl ClearGateway for MockHost {
    async fn delete_unlocked_items(&self) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(Error::delete("mock delete failure"));
        }
        Ok(())
    }
}

impl Notifier for MockHost {
    fn show_notification(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("Lock poisoned")
            .push(notification);
    }
}

impl MenuRegistry for MockHost {
    fn register_entry(&mut self, title: &str, action: MenuAction) -> Result<()> {
        if self.fail_menu {
            return Err(Error::Host("menu is not available".to_string()));
        }
        self.menu_entries
            .lock()
            .expect("Lock poisoned")
            .push((title.to_string(), action));
        Ok(())
    }
}

impl PanelRenderer for MockHost {
    fn render(&self, view: &PanelView) -> Result<()> {
        self.views.lock().expect("Lock poisoned").push(view.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sizes_repeat_last_value() {
        let host = MockHost::new().with_sizes([3.0, 2.0]);
        assert_eq!(host.cache_stats().await.unwrap().current_size_mb, 3.0);
        assert_eq!(host.cache_stats().await.unwrap().current_size_mb, 2.0);
        assert_eq!(host.cache_stats().await.unwrap().current_size_mb, 2.0);
        assert_eq!(host.stats_calls(), 3);
    }

    #[tokio::test]
    async fn test_stats_failure_after_successes() {
        let host = MockHost::new().with_sizes([1.0]).with_stats_failure_after(1);
        assert!(host.cache_stats().await.is_ok());
        assert!(host.cache_stats().await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let host = MockHost::new();
        let clone = host.clone();
        clone.show_notification(Notification::info("hi"));
        clone.delete_unlocked_items().await.unwrap();

        assert_eq!(host.messages(), vec!["hi".to_string()]);
        assert_eq!(host.delete_calls(), 1);
    }
}
