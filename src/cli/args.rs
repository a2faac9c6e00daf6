use crate::config::paths::{CACHE_DIR_ENV, SETTINGS_ENV};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable selecting the message language.
pub const LOCALE_ENV: &str = "CACHE_CLEANER_LOCALE";

#[derive(Parser, Debug)]
#[command(name = "cache-cleaner")]
#[command(about = "Scheduled and threshold-driven cache clearing", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, env = SETTINGS_ENV)]
    pub settings: Option<PathBuf>,

    /// Cache directory to manage
    #[arg(long = "cache-dir", global = true, env = CACHE_DIR_ENV)]
    pub cache_dir: Option<PathBuf>,

    /// Message language (en, ru); defaults to $LANG
    #[arg(long, global = true, env = LOCALE_ENV)]
    pub locale: Option<String>,

    /// TOML file with a [poll] section tuning the clear polling
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv)
    /// -v: Log clear decisions
    /// -vv: Log every poll and settings write
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the once-per-start automatic clear check
    Startup,

    /// Clear the cache now and report how much was freed
    Clear,

    /// Show the settings panel with the current cache size
    Status,

    /// Change one setting (enabled, notify, frequency, threshold)
    Set {
        /// Field to change
        field: String,

        /// New value: on/off, a frequency name, or megabytes
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Register and list the menu entries
    Menu,
}

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_command_with_globals() {
        let cli = Cli::try_parse_from([
            "cache-cleaner",
            "set",
            "threshold",
            "500",
            "--settings",
            "/tmp/s.json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Commands::Set {
                field: "threshold".to_string(),
                value: "500".to_string()
            }
        );
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cli.verbosity, 2);
    }

    #[test]
    fn test_negative_threshold_reaches_validation() {
        let cli = Cli::try_parse_from(["cache-cleaner", "set", "threshold", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Set { ref value, .. } if value == "-5"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["cache-cleaner"]).is_err());
    }
}
