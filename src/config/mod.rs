//! Settings record, its persistence, and runtime tuning.

// Sub-modules
pub mod backend;
pub mod loader;
pub mod paths;
pub mod poll;
mod settings;
mod store;

// Re-export core types
pub use backend::{FileBackend, MemoryBackend, SettingsBackend};
pub use loader::load_poll_policy;
pub use paths::{LocationSource, Paths};
pub use poll::{PollPolicy, PollStrategy};
pub use settings::{schedule_after, Configuration, Frequency};
pub use store::{SettingsStore, SETTINGS_KEY};
