//! Setup and initialization functions for CLI
//!
//! Logging, locale selection and the runtime used by the binary.

use crate::i18n::Locale;
use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive for a verbosity count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(color);

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

/// Locale from the flag/env value, else `LANG`, else English.
pub fn resolve_locale(explicit: Option<&str>) -> Locale {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("LANG").ok())
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}

/// Single-threaded runtime; the cleaner only needs timers.
pub fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")
}
