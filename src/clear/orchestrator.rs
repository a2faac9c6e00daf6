//! One clear cycle against an eventually-consistent host.
//!
//! The host's delete call returns before its effect is visible, so a cycle
//! measures the size, asks for deletion, waits the settle delay and then
//! measures again. Automatic purges keep re-polling (bounded by
//! [`PollPolicy`]) until a decrease shows up; manual clears report whatever
//! the first check sees.

use crate::config::PollPolicy;
use crate::host::{HostEnv, Notification};
use crate::i18n::{MessageKey, Messages};
use tokio::time::{sleep, Instant};

/// Who asked for the clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTrigger {
    /// The user pressed "Clear cache"
    Manual,
    /// Automatic clear from the startup decision
    Purge,
}

/// Result of one clear cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearOutcome {
    /// The size dropped by `freed_mb` after `retries` re-polls
    Cleared { freed_mb: f64, retries: u32 },
    /// Manual clear that freed nothing
    AlreadyEmpty,
    /// Purge whose effect never showed up within the poll budget
    NoChange { retries: u32 },
    /// A size measurement failed; the cycle was abandoned
    StatsUnavailable,
    /// The host refused to start deletion
    DeleteFailed,
}

impl ClearOutcome {
    pub fn freed_mb(&self) -> f64 {
        match self {
            Self::Cleared { freed_mb, .. } => *freed_mb,
            _ => 0.0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::StatsUnavailable | Self::DeleteFailed)
    }
}

/// Runs clear cycles against a host.
pub struct ClearOrchestrator<'a, H> {
    host: &'a H,
    messages: Messages,
    policy: PollPolicy,
}

impl<'a, H: HostEnv> ClearOrchestrator<'a, H> {
    pub fn new(host: &'a H, messages: Messages, policy: PollPolicy) -> Self {
        Self {
            host,
            messages,
            policy,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Run one clear cycle.
    ///
    /// `notify` is the user's "show notification" setting; it only gates the
    /// "cleared" message of purges. Manual clears always report.
    pub async fn run_clear(&self, trigger: ClearTrigger, notify: bool) -> ClearOutcome {
        let initial_mb = match self.host.cache_stats().await {
            Ok(stats) => stats.current_size_mb,
            Err(e) => {
                tracing::error!(error = %e, "Error getting initial cache stats");
                self.notify_error(MessageKey::StatsErrorNotification);
                return ClearOutcome::StatsUnavailable;
            }
        };

        if let Err(e) = self.host.delete_unlocked_items().await {
            tracing::error!(error = %e, "Error deleting unlocked items");
            self.notify_error(MessageKey::ClearErrorNotification);
            return ClearOutcome::DeleteFailed;
        }

        sleep(self.policy.settle_delay()).await;

        let polling_since = Instant::now();
        let mut retries = 0u32;
        loop {
            let final_mb = match self.host.cache_stats().await {
                Ok(stats) => stats.current_size_mb,
                Err(e) => {
                    tracing::error!(error = %e, "Error getting final cache stats");
                    self.notify_error(MessageKey::CheckErrorNotification);
                    return ClearOutcome::StatsUnavailable;
                }
            };

            let freed_mb = initial_mb - final_mb;
            if freed_mb > 0.0 {
                return self.report_cleared(trigger, notify, freed_mb, retries);
            }

            if trigger == ClearTrigger::Manual {
                self.host.show_notification(Notification::info(
                    self.messages.text(MessageKey::AlreadyEmptyNotification),
                ));
                return ClearOutcome::AlreadyEmpty;
            }

            if !self.policy.should_retry(retries, polling_since.elapsed()) {
                tracing::info!(
                    retries,
                    initial_mb,
                    final_mb,
                    "Cache size never decreased; giving up on this purge"
                );
                return ClearOutcome::NoChange { retries };
            }

            retries += 1;
            tracing::debug!(retries, "Cache size didn't decrease yet, checking again");
            sleep(self.policy.delay_for_retry(retries)).await;
        }
    }

    fn report_cleared(
        &self,
        trigger: ClearTrigger,
        notify: bool,
        freed_mb: f64,
        retries: u32,
    ) -> ClearOutcome {
        tracing::info!(freed_mb, retries, ?trigger, "Cache cleared");
        if notify || trigger == ClearTrigger::Manual {
            self.host
                .show_notification(Notification::info(self.messages.cleared(freed_mb)));
        }
        ClearOutcome::Cleared { freed_mb, retries }
    }

    fn notify_error(&self, key: MessageKey) {
        self.host
            .show_notification(Notification::error(self.messages.text(key)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MockHost;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn orchestrator(host: &MockHost) -> ClearOrchestrator<'_, MockHost> {
        ClearOrchestrator::new(host, Messages::default(), PollPolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_polls_until_decrease_observed() {
        let host = MockHost::new().with_sizes([100.0, 100.0, 100.0, 70.0]);

        let outcome = orchestrator(&host).run_clear(ClearTrigger::Purge, true).await;

        assert_eq!(
            outcome,
            ClearOutcome::Cleared {
                freed_mb: 30.0,
                retries: 2
            }
        );
        assert_eq!(host.stats_calls(), 4);
        assert_eq!(host.delete_calls(), 1);
        assert_eq!(host.messages(), vec!["Cleared 30.00 MB of cache".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_waits_settle_then_retry_delays() {
        let host = MockHost::new().with_sizes([100.0, 100.0, 100.0, 70.0]);
        let started = Instant::now();

        orchestrator(&host).run_clear(ClearTrigger::Purge, false).await;

        // 500ms settle + two 1000ms re-poll delays
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2500));
        assert!(elapsed < Duration::from_millis(2600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_without_notify_is_silent() {
        let host = MockHost::new().with_sizes([50.0, 10.0]);

        let outcome = orchestrator(&host).run_clear(ClearTrigger::Purge, false).await;

        assert_eq!(outcome.freed_mb(), 40.0);
        assert!(host.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_gives_up_after_budget() {
        let host = MockHost::new().with_sizes([100.0]);
        let policy = PollPolicy {
            max_retries: 3,
            ..Default::default()
        };

        let outcome = ClearOrchestrator::new(&host, Messages::default(), policy)
            .run_clear(ClearTrigger::Purge, true)
            .await;

        assert_eq!(outcome, ClearOutcome::NoChange { retries: 3 });
        assert_eq!(host.stats_calls(), 5);
        assert!(host.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_gives_up_after_timeout() {
        let host = MockHost::new().with_sizes([100.0]);
        let policy = PollPolicy {
            max_retries: 1_000,
            timeout_seconds: 5,
            ..Default::default()
        };

        let outcome = ClearOrchestrator::new(&host, Messages::default(), policy)
            .run_clear(ClearTrigger::Purge, true)
            .await;

        assert_eq!(outcome, ClearOutcome::NoChange { retries: 5 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_growing_cache_is_never_reported_negative() {
        let host = MockHost::new().with_sizes([10.0, 25.0]);

        let outcome = orchestrator(&host).run_clear(ClearTrigger::Manual, true).await;

        assert_eq!(outcome, ClearOutcome::AlreadyEmpty);
        assert_eq!(
            host.messages(),
            vec!["Cache is already empty or could not be cleared further.".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_empty_cache_reports_already_empty() {
        let host = MockHost::new().with_sizes([0.0, 0.0]);

        let outcome = orchestrator(&host).run_clear(ClearTrigger::Manual, false).await;

        assert_eq!(outcome, ClearOutcome::AlreadyEmpty);
        let messages = host.messages();
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].starts_with("Cleared"));
        assert_eq!(host.stats_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_clear_reports_even_with_notify_off() {
        let host = MockHost::new().with_sizes([12.5, 2.5]);

        orchestrator(&host).run_clear(ClearTrigger::Manual, false).await;

        assert_eq!(host.messages(), vec!["Cleared 10.00 MB of cache".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_stats_failure_aborts() {
        let host = MockHost::new().with_stats_failure();

        let outcome = orchestrator(&host).run_clear(ClearTrigger::Purge, true).await;

        assert_eq!(outcome, ClearOutcome::StatsUnavailable);
        assert_eq!(host.delete_calls(), 0);
        let notifications = host.notifications();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].is_error);
        assert_eq!(notifications[0].message, "Error getting cache stats");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_failure_aborts() {
        let host = MockHost::new().with_sizes([40.0]).with_delete_failure();

        let outcome = orchestrator(&host).run_clear(ClearTrigger::Manual, true).await;

        assert_eq!(outcome, ClearOutcome::DeleteFailed);
        assert!(outcome.is_failure());
        assert_eq!(host.stats_calls(), 1);
        assert_eq!(host.messages(), vec!["Error clearing cache".to_string()]);
    }
}
