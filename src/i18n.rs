//! User-facing text in English and Russian.
//!
//! The clear and decision logic never builds strings itself; it asks a
//! [`Messages`] catalog for the resolved text and hands it to the notifier.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Pick a locale from a language tag such as `ru_RU.UTF-8` or `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("ru") {
            Self::Ru
        } else {
            Self::En
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Ru => f.write_str("ru"),
        }
    }
}

/// Every translatable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    MenuTitle,
    ModalTitle,
    EnableLabel,
    EnableInfo,
    NotifyLabel,
    NotifyInfo,
    FrequencyLabel,
    FrequencyInfo,
    FreqNever,
    FreqLaunch,
    FreqDaily,
    FreqWeekly,
    FreqMonthly,
    ThresholdLabel,
    ThresholdInfo,
    CacheSizeLabel,
    Fetching,
    Clearing,
    SizeError,
    ClearCacheButton,
    ClearedNotification,
    AlreadyEmptyNotification,
    InvalidThresholdNotification,
    StatsErrorNotification,
    CheckErrorNotification,
    ClearErrorNotification,
    LoadErrorNotification,
}

impl MessageKey {
    fn translations(self) -> (&'static str, &'static str) {
        match self {
            Self::MenuTitle => ("Cache config", "Настройки кэша"),
            Self::ModalTitle => ("Cache config", "Настройки кэша"),
            Self::EnableLabel => ("Enable", "Включить"),
            Self::EnableInfo => (
                "Enable automatic cache cleaning",
                "Включить автоматическую очистку кэша",
            ),
            Self::NotifyLabel => ("Show notification", "Показывать уведомление"),
            Self::NotifyInfo => (
                "Notify when cache is cleared automatically",
                "Уведомлять об автоматической очистке кэша",
            ),
            Self::FrequencyLabel => ("Frequency", "Частота"),
            Self::FrequencyInfo => (
                "Automatically clear cache after a certain amount of time",
                "Автоматически очищать кэш через определенный промежуток времени",
            ),
            Self::FreqNever => ("Never", "Никогда"),
            Self::FreqLaunch => ("On launch", "При запуске"),
            Self::FreqDaily => ("After a day", "Раз в день"),
            Self::FreqWeekly => ("After a week", "Раз в неделю"),
            Self::FreqMonthly => ("After a month", "Раз в месяц"),
            Self::ThresholdLabel => ("Size threshold (MB)", "Порог размера (МБ)"),
            Self::ThresholdInfo => (
                "Clear cache when it reaches this size (0 to disable)",
                "Очищать кэш, когда он достигает этого размера (0 для отключения)",
            ),
            Self::CacheSizeLabel => ("Cache size:", "Размер кэша:"),
            Self::Fetching => ("Fetching...", "Получение..."),
            Self::Clearing => ("Clearing...", "Очистка..."),
            Self::SizeError => ("Error", "Ошибка"),
            Self::ClearCacheButton => ("Clear cache", "Очистить кэш"),
            Self::ClearedNotification => ("Cleared % MB of cache", "Очищено % МБ кэша"),
            Self::AlreadyEmptyNotification => (
                "Cache is already empty or could not be cleared further.",
                "Кэш уже пуст или не может быть очищен дальше.",
            ),
            Self::InvalidThresholdNotification => (
                "Invalid threshold value, please enter a number",
                "Неверное значение порога, введите число",
            ),
            Self::StatsErrorNotification => {
                ("Error getting cache stats", "Ошибка получения размера кэша")
            }
            Self::CheckErrorNotification => (
                "Error checking cache size after clear",
                "Ошибка проверки размера кэша после очистки",
            ),
            Self::ClearErrorNotification => ("Error clearing cache", "Ошибка очистки кэша"),
            Self::LoadErrorNotification => (
                "Error loading Cache Cleaner: %",
                "Ошибка загрузки Cache Cleaner: %",
            ),
        }
    }
}

/// Resolved message catalog for one locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn text(&self, key: MessageKey) -> &'static str {
        let (en, ru) = key.translations();
        match self.locale {
            Locale::En => en,
            Locale::Ru if ru.is_empty() => en,
            Locale::Ru => ru,
        }
    }

    /// Substitute each `%` placeholder, in order, with the next argument.
    pub fn format(&self, key: MessageKey, args: &[&str]) -> String {
        args.iter()
            .fold(self.text(key).to_string(), |text, arg| {
                text.replacen('%', arg, 1)
            })
    }

    /// "Cleared N MB of cache" with two decimals.
    pub fn cleared(&self, freed_mb: f64) -> String {
        self.format(MessageKey::ClearedNotification, &[&format!("{:.2}", freed_mb)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(Locale::from_tag("ru_RU.UTF-8"), Locale::Ru);
        assert_eq!(Locale::from_tag("RU"), Locale::Ru);
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("de"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn test_text_per_locale() {
        assert_eq!(Messages::new(Locale::En).text(MessageKey::EnableLabel), "Enable");
        assert_eq!(Messages::new(Locale::Ru).text(MessageKey::EnableLabel), "Включить");
    }

    #[test]
    fn test_cleared_formats_two_decimals() {
        assert_eq!(Messages::new(Locale::En).cleared(30.0), "Cleared 30.00 MB of cache");
        assert_eq!(Messages::new(Locale::Ru).cleared(1.456), "Очищено 1.46 МБ кэша");
    }

    #[test]
    fn test_format_replaces_in_order() {
        let messages = Messages::new(Locale::En);
        assert_eq!(
            messages.format(MessageKey::LoadErrorNotification, &["menu unavailable"]),
            "Error loading Cache Cleaner: menu unavailable"
        );
        // Extra arguments without a placeholder are ignored
        assert_eq!(
            messages.format(MessageKey::EnableLabel, &["unused"]),
            "Enable"
        );
    }
}
