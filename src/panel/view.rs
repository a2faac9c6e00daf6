//! Localized view model of the settings panel.
//!
//! [`PanelView::build`] turns panel state into rows of resolved text. A
//! [`PanelRenderer`] draws the view however the host likes.

use super::fields::{visible_fields, Field};
use crate::config::{Configuration, Frequency};
use crate::errors::Result;
use crate::i18n::{MessageKey, Messages};

/// What the cache size line currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizeReadout {
    #[default]
    Fetching,
    Size(f64),
    Clearing,
    Error,
}

impl SizeReadout {
    pub fn text(&self, messages: &Messages) -> String {
        match self {
            Self::Fetching => messages.text(MessageKey::Fetching).to_string(),
            Self::Size(mb) => format!("{:.2} MB", mb),
            Self::Clearing => messages.text(MessageKey::Clearing).to_string(),
            Self::Error => messages.text(MessageKey::SizeError).to_string(),
        }
    }
}

/// Everything the panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub config: Configuration,
    pub readout: SizeReadout,
    /// False while a manual clear is running
    pub clear_enabled: bool,
}

impl PanelState {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            readout: SizeReadout::Fetching,
            clear_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Toggle(bool),
    /// Selected frequency key plus `(key, label)` for each option
    Choice {
        selected: String,
        options: Vec<(String, String)>,
    },
    Number(f64),
}

impl FieldValue {
    /// Short text form of the current value.
    pub fn display(&self) -> String {
        match self {
            Self::Toggle(true) => "on".to_string(),
            Self::Toggle(false) => "off".to_string(),
            Self::Choice { selected, options } => options
                .iter()
                .find(|(key, _)| key == selected)
                .map_or_else(|| selected.clone(), |(_, label)| label.clone()),
            Self::Number(value) => format!("{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub field: Field,
    pub label: String,
    pub info: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub rows: Vec<FieldRow>,
    /// e.g. "Cache size: 12.34 MB"
    pub size_line: String,
    pub button_label: String,
    pub button_enabled: bool,
}

impl PanelView {
    pub fn build(state: &PanelState, messages: &Messages) -> Self {
        let rows = visible_fields(&state.config)
            .into_iter()
            .map(|field| field_row(field, &state.config, messages))
            .collect();

        let button_label = if state.clear_enabled {
            messages.text(MessageKey::ClearCacheButton)
        } else {
            messages.text(MessageKey::Clearing)
        };

        Self {
            title: messages.text(MessageKey::ModalTitle).to_string(),
            rows,
            size_line: format!(
                "{} {}",
                messages.text(MessageKey::CacheSizeLabel),
                state.readout.text(messages)
            ),
            button_label: button_label.to_string(),
            button_enabled: state.clear_enabled,
        }
    }
}

fn field_row(field: Field, config: &Configuration, messages: &Messages) -> FieldRow {
    let (label, info, value) = match field {
        Field::Enabled => (
            MessageKey::EnableLabel,
            MessageKey::EnableInfo,
            FieldValue::Toggle(config.enabled),
        ),
        Field::Notify => (
            MessageKey::NotifyLabel,
            MessageKey::NotifyInfo,
            FieldValue::Toggle(config.notify),
        ),
        Field::Frequency => (
            MessageKey::FrequencyLabel,
            MessageKey::FrequencyInfo,
            FieldValue::Choice {
                selected: config.frequency.as_str().to_string(),
                options: Frequency::SELECTABLE
                    .iter()
                    .map(|f| (f.as_str().to_string(), frequency_label(f, messages)))
                    .collect(),
            },
        ),
        Field::Threshold => (
            MessageKey::ThresholdLabel,
            MessageKey::ThresholdInfo,
            FieldValue::Number(config.threshold_mb),
        ),
    };

    FieldRow {
        field,
        label: messages.text(label).to_string(),
        info: messages.text(info).to_string(),
        value,
    }
}

fn frequency_label(frequency: &Frequency, messages: &Messages) -> String {
    let key = match frequency {
        Frequency::Never => MessageKey::FreqNever,
        Frequency::Launch => MessageKey::FreqLaunch,
        Frequency::Daily => MessageKey::FreqDaily,
        Frequency::Weekly => MessageKey::FreqWeekly,
        Frequency::Monthly => MessageKey::FreqMonthly,
        Frequency::Unrecognized(raw) => return raw.clone(),
    };
    messages.text(key).to_string()
}

/// Draws a [`PanelView`].
pub trait PanelRenderer {
    fn render(&self, view: &PanelView) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_readout_text() {
        let messages = Messages::default();
        assert_eq!(SizeReadout::Size(12.345).text(&messages), "12.35 MB");
        assert_eq!(SizeReadout::Fetching.text(&messages), "Fetching...");
        assert_eq!(SizeReadout::Error.text(&messages), "Error");
    }

    #[test]
    fn test_disabled_panel_shows_only_enable_row() {
        let mut state = PanelState::new(Configuration::default());
        state.config.enabled = false;

        let view = PanelView::build(&state, &Messages::default());

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].label, "Enable");
        assert_eq!(view.rows[0].value, FieldValue::Toggle(false));
    }

    #[test]
    fn test_clearing_state_disables_button() {
        let mut state = PanelState::new(Configuration::default());
        state.readout = SizeReadout::Clearing;
        state.clear_enabled = false;

        let view = PanelView::build(&state, &Messages::default());

        assert_eq!(view.size_line, "Cache size: Clearing...");
        assert_eq!(view.button_label, "Clearing...");
        assert!(!view.button_enabled);
    }

    #[test]
    fn test_russian_view() {
        let mut state = PanelState::new(Configuration::default());
        state.readout = SizeReadout::Size(1.0);

        let view = PanelView::build(&state, &Messages::new(Locale::Ru));

        assert_eq!(view.title, "Настройки кэша");
        assert_eq!(view.size_line, "Размер кэша: 1.00 MB");
        assert_eq!(view.rows[2].value.display(), "Раз в неделю");
    }

    #[test]
    fn test_unrecognized_frequency_displays_raw_value() {
        let mut config = Configuration::default();
        config.frequency = Frequency::from("hourly");
        let view = PanelView::build(&PanelState::new(config), &Messages::default());

        assert_eq!(view.rows[2].value.display(), "hourly");
    }
}
