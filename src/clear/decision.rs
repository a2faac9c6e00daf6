//! The once-per-start auto-clear decision.
//!
//! [`evaluate`] is pure: given the loaded settings, the current cache size and
//! the time, it says whether the threshold needs repairing and which rule (if
//! any) triggers a clear. [`AutoClear`] applies that plan: it persists the
//! repaired threshold, runs at most one purge, and advances the schedule.
//!
//! Rules are checked in priority order and the first match wins:
//!
//! 1. disabled: nothing happens
//! 2. invalid threshold: reset to 0 (not an abort)
//! 3. threshold: size above a non-zero threshold; schedule untouched
//! 4. schedule: a scheduled clear is due; schedule advanced afterwards
//! 5. launch: "on launch" clears every start; schedule untouched

use super::orchestrator::{ClearOrchestrator, ClearOutcome, ClearTrigger};
use crate::config::{
    schedule_after, Configuration, Frequency, PollPolicy, SettingsBackend, SettingsStore,
};
use crate::errors::{Error, Result};
use crate::host::{HostEnv, Notification};
use crate::i18n::{MessageKey, Messages};

/// Why an automatic clear was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Threshold,
    Schedule,
    Launch,
}

/// Output of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoClearPlan {
    /// The stored threshold was invalid and must be reset to 0
    pub repair_threshold: bool,
    pub clear: Option<ClearReason>,
}

/// Threshold as a usable number, or `InvalidThreshold`.
pub fn validated_threshold(threshold_mb: f64) -> Result<f64> {
    if threshold_mb.is_finite() && threshold_mb >= 0.0 {
        Ok(threshold_mb)
    } else {
        Err(Error::InvalidThreshold(threshold_mb))
    }
}

/// Decide what the startup check should do. Pure.
pub fn evaluate(config: &Configuration, current_size_mb: f64, now_ms: i64) -> AutoClearPlan {
    if !config.enabled {
        return AutoClearPlan::default();
    }

    let (threshold_mb, repair_threshold) = match validated_threshold(config.threshold_mb) {
        Ok(threshold_mb) => (threshold_mb, false),
        Err(_) => (0.0, true),
    };

    let clear = if threshold_mb > 0.0 && current_size_mb > threshold_mb {
        Some(ClearReason::Threshold)
    } else if schedule_is_due(config, now_ms) {
        Some(ClearReason::Schedule)
    } else if config.frequency == Frequency::Launch {
        Some(ClearReason::Launch)
    } else {
        None
    };

    AutoClearPlan {
        repair_threshold,
        clear,
    }
}

/// `launch` is handled by its own rule so its schedule value is never touched.
fn schedule_is_due(config: &Configuration, now_ms: i64) -> bool {
    !matches!(config.frequency, Frequency::Never | Frequency::Launch)
        && config.next_clear_at > 0
        && now_ms >= config.next_clear_at
}

/// Next schedule value after a scheduled clear ran at `now_ms`.
pub fn next_schedule(frequency: &Frequency, now_ms: i64) -> i64 {
    frequency
        .timed_interval()
        .map_or(0, |interval| schedule_after(now_ms, interval))
}

/// What the startup check did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoClearReport {
    /// Automatic clearing is switched off
    Disabled,
    /// The size could not be measured; nothing was evaluated this run
    StatsUnavailable,
    Evaluated {
        threshold_repaired: bool,
        cleared: Option<(ClearReason, ClearOutcome)>,
    },
}

/// Applies [`evaluate`] against a host and the settings store.
pub struct AutoClear<'a, H, B> {
    host: &'a H,
    store: &'a SettingsStore<B>,
    messages: Messages,
    policy: PollPolicy,
}

impl<'a, H: HostEnv, B: SettingsBackend> AutoClear<'a, H, B> {
    pub fn new(
        host: &'a H,
        store: &'a SettingsStore<B>,
        messages: Messages,
        policy: PollPolicy,
    ) -> Self {
        Self {
            host,
            store,
            messages,
            policy,
        }
    }

    /// Measure the cache and run the decision. Call once per process start.
    pub async fn run_on_startup(&self, config: &mut Configuration, now_ms: i64) -> AutoClearReport {
        if !config.enabled {
            tracing::debug!("Automatic cache clearing is disabled");
            return AutoClearReport::Disabled;
        }

        match self.host.cache_stats().await {
            Ok(stats) => self.run_with_size(config, stats.current_size_mb, now_ms).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to get stats for auto-clear check");
                AutoClearReport::StatsUnavailable
            }
        }
    }

    /// Run the decision for an already measured size.
    pub async fn run_with_size(
        &self,
        config: &mut Configuration,
        current_size_mb: f64,
        now_ms: i64,
    ) -> AutoClearReport {
        if !config.enabled {
            return AutoClearReport::Disabled;
        }

        let plan = evaluate(config, current_size_mb, now_ms);

        if plan.repair_threshold {
            tracing::warn!(threshold_mb = config.threshold_mb, "Resetting invalid threshold to 0");
            config.threshold_mb = 0.0;
            self.persist(config);
            self.host.show_notification(Notification::info(
                self.messages.text(MessageKey::InvalidThresholdNotification),
            ));
        }

        let Some(reason) = plan.clear else {
            return AutoClearReport::Evaluated {
                threshold_repaired: plan.repair_threshold,
                cleared: None,
            };
        };

        match reason {
            ClearReason::Threshold => tracing::info!(
                size_mb = current_size_mb,
                threshold_mb = config.threshold_mb,
                "Cache size exceeds threshold. Clearing..."
            ),
            ClearReason::Schedule => tracing::info!("Scheduled time reached. Clearing cache..."),
            ClearReason::Launch => tracing::info!("Frequency set to on launch. Clearing cache..."),
        }

        let outcome = ClearOrchestrator::new(self.host, self.messages, self.policy.clone())
            .run_clear(ClearTrigger::Purge, config.notify)
            .await;

        if reason == ClearReason::Schedule {
            config.next_clear_at = next_schedule(&config.frequency, now_ms);
            tracing::debug!(next_clear_at = config.next_clear_at, "Advanced clear schedule");
            self.persist(config);
        }

        AutoClearReport::Evaluated {
            threshold_repaired: plan.repair_threshold,
            cleared: Some((reason, outcome)),
        }
    }

    fn persist(&self, config: &Configuration) {
        if let Err(e) = self.store.save(config) {
            tracing::warn!(error = %e, "Failed to persist settings");
        }
    }
}
