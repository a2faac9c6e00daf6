//! Loading, normalizing and persisting the settings record.

use super::backend::SettingsBackend;
use super::settings::{schedule_after, Configuration, Frequency, StoredConfiguration};
use crate::errors::Result;
use std::time::Duration;

/// Storage key of the settings blob.
pub const SETTINGS_KEY: &str = "cache-cleaner:config";

/// Reads and writes the single [`Configuration`] record.
#[derive(Debug, Clone)]
pub struct SettingsStore<B> {
    backend: B,
    key: String,
}

impl<B: SettingsBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, SETTINGS_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the record, fill defaults and write the normalized record back.
    ///
    /// Never fails: unreadable or corrupt data loads as an empty record, and
    /// a failed write-back is only logged.
    pub fn load(&self, now_ms: i64) -> Configuration {
        let stored = self.read_stored();
        let config = normalize(stored, now_ms);

        if let Err(e) = self.save(&config) {
            tracing::warn!(error = %e, "Failed to persist normalized settings");
        }

        config
    }

    /// Persist the full record.
    ///
    /// The record is serialized before the backend is touched, so a
    /// serialization failure leaves the stored value as it was.
    pub fn save(&self, config: &Configuration) -> Result<()> {
        let blob = serde_json::to_string(config)?;
        self.backend.set_item(&self.key, &blob)?;
        tracing::debug!(key = %self.key, "Saved settings");
        Ok(())
    }

    fn read_stored(&self) -> StoredConfiguration {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No stored settings; using defaults");
                return StoredConfiguration::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored settings; using defaults");
                return StoredConfiguration::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored settings are corrupt; using defaults");
            StoredConfiguration::default()
        })
    }
}

/// Interval used for a missing schedule when the frequency is unrecognized.
fn fallback_interval() -> Duration {
    Frequency::Weekly
        .cadence_interval()
        .unwrap_or(Duration::from_secs(7 * 24 * 60 * 60))
}

/// Pure default-filling step of [`SettingsStore::load`].
pub(crate) fn normalize(stored: StoredConfiguration, now_ms: i64) -> Configuration {
    let frequency = stored.frequency.unwrap_or_default();

    let next_clear_at = if frequency == Frequency::Never {
        0
    } else {
        stored.next_clear_at.unwrap_or_else(|| {
            let interval = frequency
                .cadence_interval()
                .unwrap_or_else(fallback_interval);
            schedule_after(now_ms, interval)
        })
    };

    Configuration {
        enabled: stored.enabled.unwrap_or(true),
        notify: stored.notify.unwrap_or(true),
        frequency,
        next_clear_at,
        threshold_mb: stored.threshold_mb.unwrap_or(0.0),
    }
}
