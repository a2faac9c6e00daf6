//! Pure rules behind the settings panel's fields.

use crate::config::{schedule_after, Configuration, Frequency};
use crate::errors::{Error, Result};

/// One editable field of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Enabled,
    Notify,
    Frequency,
    Threshold,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Enabled,
        Field::Notify,
        Field::Frequency,
        Field::Threshold,
    ];

    /// Name used on the command line and in persisted JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Notify => "notify",
            Self::Frequency => "frequency",
            Self::Threshold => "threshold",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Enabled(bool),
    Notify(bool),
    Frequency(Frequency),
    Threshold(f64),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            Self::Enabled(_) => Field::Enabled,
            Self::Notify(_) => Field::Notify,
            Self::Frequency(_) => Field::Frequency,
            Self::Threshold(_) => Field::Threshold,
        }
    }

    /// Parse a `<field> <value>` pair typed by the user.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let field = Field::from_key(field)
            .ok_or_else(|| Error::Configuration(format!("Unknown field '{}'", field)))?;
        match field {
            Field::Enabled => parse_toggle(value).map(Self::Enabled),
            Field::Notify => parse_toggle(value).map(Self::Notify),
            Field::Frequency => {
                let frequency = Frequency::from(value);
                if frequency.is_recognized() {
                    Ok(Self::Frequency(frequency))
                } else {
                    Err(Error::Configuration(format!(
                        "Unknown frequency '{}', expected one of: never, launch, daily, weekly, monthly",
                        value
                    )))
                }
            }
            Field::Threshold => parse_threshold_input(value).map(Self::Threshold),
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(Error::Configuration(format!(
            "Expected on/off, got '{}'",
            other
        ))),
    }
}

/// Apply an edit to `config`. A frequency change also reschedules the next
/// clear: `never` and `launch` get 0, timed frequencies get `now + cadence`.
pub fn apply_field_change(config: &mut Configuration, change: FieldChange, now_ms: i64) {
    match change {
        FieldChange::Enabled(enabled) => config.enabled = enabled,
        FieldChange::Notify(notify) => config.notify = notify,
        FieldChange::Threshold(threshold_mb) => config.threshold_mb = threshold_mb,
        FieldChange::Frequency(frequency) => {
            config.next_clear_at = frequency
                .timed_interval()
                .map_or(0, |interval| schedule_after(now_ms, interval));
            config.frequency = frequency;
        }
    }
}

/// Accept digits only. An empty input means 0 (threshold disabled).
pub fn parse_threshold_input(raw: &str) -> Result<f64> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Configuration(format!(
            "Threshold must be a whole number of megabytes, got '{}'",
            raw
        )));
    }
    raw.parse::<f64>()
        .map_err(|e| Error::Configuration(format!("Invalid threshold '{}': {}", raw, e)))
}

/// Fields shown for `config`. The rest only make sense while enabled.
pub fn visible_fields(config: &Configuration) -> Vec<Field> {
    if config.enabled {
        Field::ALL.to_vec()
    } else {
        vec![Field::Enabled]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_contains_error, assert_result_ok};
    use pretty_assertions::assert_eq;

    const NOW: i64 = 1_700_000_000_000;
    const DAY: i64 = 24 * 60 * 60 * 1000;

    fn scheduled(frequency: Frequency, next_clear_at: i64) -> Configuration {
        Configuration {
            frequency,
            next_clear_at,
            ..Configuration::default()
        }
    }

    #[test]
    fn test_frequency_change_reschedules() {
        let mut config = scheduled(Frequency::Weekly, 123);

        apply_field_change(&mut config, FieldChange::Frequency(Frequency::Daily), NOW);
        assert_eq!(config.frequency, Frequency::Daily);
        assert_eq!(config.next_clear_at, NOW + DAY);

        apply_field_change(&mut config, FieldChange::Frequency(Frequency::Monthly), NOW);
        assert_eq!(config.next_clear_at, NOW + 30 * DAY);

        apply_field_change(&mut config, FieldChange::Frequency(Frequency::Never), NOW);
        assert_eq!(config.next_clear_at, 0);

        apply_field_change(&mut config, FieldChange::Frequency(Frequency::Launch), NOW);
        assert_eq!(config.next_clear_at, 0);
    }

    #[test]
    fn test_other_changes_leave_schedule_alone() {
        let mut config = scheduled(Frequency::Weekly, 555);

        apply_field_change(&mut config, FieldChange::Enabled(false), NOW);
        apply_field_change(&mut config, FieldChange::Notify(false), NOW);
        apply_field_change(&mut config, FieldChange::Threshold(250.0), NOW);

        assert!(!config.enabled);
        assert!(!config.notify);
        assert_eq!(config.threshold_mb, 250.0);
        assert_eq!(config.next_clear_at, 555);
    }

    #[test]
    fn test_threshold_input() {
        assert_eq!(assert_result_ok!(parse_threshold_input("")), 0.0);
        assert_eq!(assert_result_ok!(parse_threshold_input("0")), 0.0);
        assert_eq!(assert_result_ok!(parse_threshold_input("512")), 512.0);
        for rejected in ["-1", "1.5", "abc", " 12", "1e3"] {
            assert_contains_error!(parse_threshold_input(rejected), "whole number");
        }
    }

    #[test]
    fn test_visible_fields_follow_enabled() {
        let mut config = Configuration::default();
        assert_eq!(visible_fields(&config), Field::ALL.to_vec());

        config.enabled = false;
        assert_eq!(visible_fields(&config), vec![Field::Enabled]);
    }

    #[test]
    fn test_parse_change() {
        assert_eq!(
            assert_result_ok!(FieldChange::parse("enabled", "off")),
            FieldChange::Enabled(false)
        );
        assert_eq!(
            assert_result_ok!(FieldChange::parse("frequency", "daily")),
            FieldChange::Frequency(Frequency::Daily)
        );
        assert_eq!(
            assert_result_ok!(FieldChange::parse("threshold", "")),
            FieldChange::Threshold(0.0)
        );
        assert_contains_error!(FieldChange::parse("frequency", "hourly"), "Unknown frequency");
        assert_contains_error!(FieldChange::parse("notify", "maybe"), "Expected on/off");
        assert_contains_error!(FieldChange::parse("colour", "red"), "Unknown field 'colour'");
    }
}
