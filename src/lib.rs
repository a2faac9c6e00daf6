//! Automatic clearing of a host-managed cache.
//!
//! On every start the cleaner loads its settings, measures the cache and
//! decides (threshold first, then schedule, then "on launch") whether to
//! clear it. Deletion on the host is eventually consistent, so a clear cycle
//! re-polls the size for a bounded time before giving up.
//!
//! - [`config`]: the persisted settings record and runtime tuning
//! - [`clear`]: the clear cycle and the startup decision
//! - [`host`]: capabilities the host provides, plus local implementations
//! - [`panel`]: the settings panel
//! - [`cli`]: the `cache-cleaner` binary's commands

pub mod clear;
pub mod cli;
pub mod clock;
pub mod config;
pub mod errors;
pub mod host;
pub mod i18n;
pub mod panel;
pub mod testkit;

pub use crate::clear::{
    evaluate, AutoClear, AutoClearPlan, AutoClearReport, ClearOrchestrator, ClearOutcome,
    ClearReason, ClearTrigger,
};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{
    Configuration, FileBackend, Frequency, MemoryBackend, PollPolicy, SettingsBackend,
    SettingsStore,
};
pub use crate::errors::{Error, Result};
pub use crate::host::{
    CacheStats, ClearGateway, HostEnv, MenuAction, MenuRegistry, Notification, Notifier,
    StatsGateway,
};
pub use crate::i18n::{Locale, MessageKey, Messages};
pub use crate::panel::{FieldChange, SettingsPanel};
