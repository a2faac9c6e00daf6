//! Where settings and the managed cache live on disk.

use std::path::{Path, PathBuf};

/// Environment variable overriding the settings file.
pub const SETTINGS_ENV: &str = "CACHE_CLEANER_SETTINGS";
/// Environment variable overriding the managed cache directory.
pub const CACHE_DIR_ENV: &str = "CACHE_CLEANER_CACHE_DIR";

const APP_DIR: &str = "cache-cleaner";

/// How a location was chosen
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Platform default directory (XDG on Linux)
    Default,
    /// Explicit flag or environment variable
    Custom,
}

/// Resolved locations of the settings store and the managed cache.
#[derive(Debug, Clone)]
pub struct Paths {
    pub settings_file: PathBuf,
    pub settings_source: LocationSource,
    pub cache_dir: PathBuf,
    pub cache_source: LocationSource,
}

impl Paths {
    /// Resolve both locations; explicit values win over platform defaults.
    ///
    /// Environment overrides are handled by clap (`env = ...`) before this is
    /// called, so `settings` and `cache_dir` already include them. Without a
    /// usable home directory the defaults fall back to the temp directory.
    pub fn resolve(settings: Option<&Path>, cache_dir: Option<&Path>) -> Self {
        let (settings_file, settings_source) = match settings {
            Some(path) => (path.to_path_buf(), LocationSource::Custom),
            None => (
                Self::default_config_dir().join("settings.json"),
                LocationSource::Default,
            ),
        };

        let (cache_dir, cache_source) = match cache_dir {
            Some(path) => (path.to_path_buf(), LocationSource::Custom),
            None => (Self::default_cache_dir(), LocationSource::Default),
        };

        Self {
            settings_file,
            settings_source,
            cache_dir,
            cache_source,
        }
    }

    /// Platform-specific config directory for the settings store
    fn default_config_dir() -> PathBuf {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg_config.is_empty() {
                return PathBuf::from(xdg_config).join(APP_DIR);
            }
        }

        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
    }

    /// Platform-specific cache directory managed by the cleaner
    fn default_cache_dir() -> PathBuf {
        if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
            if !xdg_cache.is_empty() {
                return PathBuf::from(xdg_cache).join(APP_DIR);
            }
        }

        // Fallback to temp directory
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let paths = Paths::resolve(
            Some(Path::new("/tmp/cc/settings.json")),
            Some(Path::new("/tmp/cc/cache")),
        );

        assert_eq!(paths.settings_file, PathBuf::from("/tmp/cc/settings.json"));
        assert_eq!(paths.settings_source, LocationSource::Custom);
        assert_eq!(paths.cache_dir, PathBuf::from("/tmp/cc/cache"));
        assert_eq!(paths.cache_source, LocationSource::Custom);
    }

    #[test]
    fn test_defaults_end_in_app_dir() {
        let paths = Paths::resolve(None, None);
        assert_eq!(paths.settings_source, LocationSource::Default);
        assert!(paths.settings_file.ends_with("cache-cleaner/settings.json"));
        assert!(paths.cache_dir.ends_with("cache-cleaner"));
    }
}
