//! The persisted cleaner settings record.
//!
//! One [`Configuration`] exists per installation. It is stored as a single
//! JSON blob (see [`SettingsStore`](super::SettingsStore)); this module only
//! knows the shape of the record and the cadence table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

const HOUR_MS: u64 = 60 * 60 * 1000;
const DAY_MS: u64 = 24 * HOUR_MS;

/// How often the cache is cleared automatically.
///
/// Unknown strings found in storage are kept verbatim in
/// [`Frequency::Unrecognized`] so that a round trip through the store never
/// rewrites a value the user (or a newer release) put there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Never,
    Launch,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Unrecognized(String),
}

impl Frequency {
    /// Every selectable frequency, in panel order.
    pub const SELECTABLE: [Frequency; 5] = [
        Frequency::Never,
        Frequency::Launch,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Never => "never",
            Self::Launch => "launch",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Interval associated with this frequency.
    ///
    /// `launch` maps to a zero interval; `never` and unrecognized values have
    /// no interval at all.
    pub fn cadence_interval(&self) -> Option<Duration> {
        match self {
            Self::Launch => Some(Duration::ZERO),
            Self::Daily => Some(Duration::from_millis(DAY_MS)),
            Self::Weekly => Some(Duration::from_millis(7 * DAY_MS)),
            Self::Monthly => Some(Duration::from_millis(30 * DAY_MS)),
            Self::Never | Self::Unrecognized(_) => None,
        }
    }

    /// Interval of a timed cadence (daily, weekly, monthly); `None` otherwise.
    pub fn timed_interval(&self) -> Option<Duration> {
        self.cadence_interval().filter(|interval| !interval.is_zero())
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Frequency {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "never" => Self::Never,
            "launch" => Self::Launch,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<&str> for Frequency {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Epoch milliseconds `interval` after `now_ms`, saturating.
pub fn schedule_after(now_ms: i64, interval: Duration) -> i64 {
    let interval_ms = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_add(interval_ms)
}

/// Automatic clearing settings.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    /// Master switch for automatic clearing
    pub enabled: bool,

    /// Show a notification when an automatic clear frees space
    pub notify: bool,

    pub frequency: Frequency,

    /// Epoch ms of the next scheduled clear; 0 means "not scheduled"
    #[serde(rename = "nextClearAt")]
    pub next_clear_at: i64,

    /// Size threshold in MB; 0 disables threshold-based clearing.
    ///
    /// May hold NaN or a negative number straight after loading a damaged
    /// record. The startup decision repairs it.
    #[serde(rename = "thresholdMB", serialize_with = "threshold::serialize")]
    pub threshold_mb: f64,
}

/// Defaults of a fresh install, before any schedule is computed.
impl Default for Configuration {
    fn default() -> Self {
        Self {
            enabled: true,
            notify: true,
            frequency: Frequency::default(),
            next_clear_at: 0,
            threshold_mb: 0.0,
        }
    }
}

// NaN thresholds compare equal to themselves so that a damaged record
// reloads as an identical value.
impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.enabled == other.enabled
            && self.notify == other.notify
            && self.frequency == other.frequency
            && self.next_clear_at == other.next_clear_at
            && self.threshold_mb.total_cmp(&other.threshold_mb) == Ordering::Equal
    }
}

/// The record as found in storage: every field optional.
///
/// A field holding the wrong JSON type reads as missing, so one damaged
/// field never discards the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StoredConfiguration {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub enabled: Option<bool>,

    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub notify: Option<bool>,

    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub frequency: Option<Frequency>,

    #[serde(
        default,
        rename = "nextClearAt",
        alias = "time",
        deserialize_with = "lenient::deserialize"
    )]
    pub next_clear_at: Option<i64>,

    #[serde(
        default,
        rename = "thresholdMB",
        alias = "threshold",
        deserialize_with = "threshold::deserialize"
    )]
    pub threshold_mb: Option<f64>,
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }
}

mod threshold {
    use super::*;
    use serde_json::Value;

    /// Non-finite values are written as strings; JSON has no NaN.
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => None,
            Value::Number(number) => Some(number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => Some(parse_lenient(&text)),
            _ => Some(f64::NAN),
        })
    }

    /// Numeric strings count as numbers; an empty string is zero.
    fn parse_lenient(text: &str) -> f64 {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    }
}
