//! CLI module for cache-cleaner
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{Cli, Commands, LOCALE_ENV};
pub use commands::{run, App};
pub use setup::{build_runtime, init_logging, resolve_locale};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
