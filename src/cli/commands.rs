//! Command handlers behind the `cache-cleaner` subcommands.

use super::args::{Cli, Commands};
use super::setup::resolve_locale;
use crate::clear::{AutoClear, AutoClearReport};
use crate::clock::{format_schedule, Clock, SystemClock};
use crate::config::{load_poll_policy, FileBackend, Paths, PollPolicy, SettingsStore};
use crate::errors::Error;
use crate::host::{
    ConsoleNotifier, ConsoleRenderer, DirectoryCache, LocalHost, MenuRegistry, Notification,
    Notifier, StaticMenu,
};
use crate::i18n::{MessageKey, Messages};
use crate::panel::{register_menu_entry, FieldChange, PanelRenderer, PanelView, SettingsPanel};
use anyhow::{anyhow, Result};
use std::cell::RefCell;

/// Everything a command needs, resolved once from the CLI.
pub struct App {
    pub paths: Paths,
    pub store: SettingsStore<FileBackend>,
    pub host: LocalHost,
    pub messages: Messages,
    pub policy: PollPolicy,
    clock: Box<dyn Clock>,
}

impl App {
    pub fn from_cli(cli: &Cli) -> Self {
        let paths = Paths::resolve(cli.settings.as_deref(), cli.cache_dir.as_deref());
        tracing::debug!(
            settings = %paths.settings_file.display(),
            cache = %paths.cache_dir.display(),
            "Resolved paths"
        );

        let notifier = if cli.plain {
            ConsoleNotifier::new(false)
        } else {
            ConsoleNotifier::default()
        };

        Self {
            store: SettingsStore::new(FileBackend::new(&paths.settings_file)),
            host: LocalHost::new(DirectoryCache::new(&paths.cache_dir), notifier),
            messages: Messages::new(resolve_locale(cli.locale.as_deref())),
            policy: load_poll_policy(cli.policy.as_deref()),
            clock: Box::new(SystemClock),
            paths,
        }
    }

    /// Replace the clock, e.g. to pin "now" in tests.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }
}

/// Keeps the most recent view instead of drawing every intermediate state.
#[derive(Default)]
struct LastView(RefCell<Option<PanelView>>);

impl LastView {
    fn take(&self) -> Option<PanelView> {
        self.0.borrow_mut().take()
    }
}

impl PanelRenderer for LastView {
    fn render(&self, view: &PanelView) -> crate::errors::Result<()> {
        *self.0.borrow_mut() = Some(view.clone());
        Ok(())
    }
}

pub async fn run(app: &App, command: &Commands) -> Result<()> {
    match command {
        Commands::Startup => handle_startup(app).await,
        Commands::Clear => handle_clear(app).await,
        Commands::Status => handle_status(app).await,
        Commands::Set { field, value } => handle_set(app, field, value).await,
        Commands::Menu => handle_menu(app),
    }
}

/// Register the menu entry, then run the automatic clear check once.
pub async fn handle_startup(app: &App) -> Result<()> {
    let mut menu = StaticMenu::new();
    register_startup_entry(&mut menu, &app.host, &app.messages);

    let now_ms = app.now_ms();
    let mut config = app.store.load(now_ms);
    let report = AutoClear::new(&app.host, &app.store, app.messages, app.policy.clone())
        .run_on_startup(&mut config, now_ms)
        .await;

    match report {
        AutoClearReport::Disabled => tracing::info!("Automatic clearing is disabled"),
        AutoClearReport::StatsUnavailable => {
            tracing::warn!("Skipped automatic clear check: cache size unavailable")
        }
        AutoClearReport::Evaluated {
            threshold_repaired,
            cleared: None,
        } => tracing::info!(threshold_repaired, "Nothing to clear"),
        AutoClearReport::Evaluated {
            threshold_repaired,
            cleared: Some((reason, outcome)),
        } => tracing::info!(threshold_repaired, ?reason, ?outcome, "Automatic clear finished"),
    }
    Ok(())
}

/// Menu registration that never stops startup. Returns whether it worked.
fn register_startup_entry<M, N>(menu: &mut M, notifier: &N, messages: &Messages) -> bool
where
    M: MenuRegistry,
    N: Notifier,
{
    match register_menu_entry(menu, notifier, messages) {
        Ok(()) => true,
        Err(e) => {
            // The user has already been notified.
            tracing::debug!(error = %e, "Continuing startup without a menu entry");
            false
        }
    }
}

/// Manual clear, printing the size before and after.
pub async fn handle_clear(app: &App) -> Result<()> {
    let view = LastView::default();
    let mut panel = SettingsPanel::open(&app.host, &app.store, &view, app.messages, app.now_ms())
        .await?
        .with_policy(app.policy.clone());
    if let Some(before) = view.take() {
        println!("{}", before.size_line);
    }

    let outcome = panel.clear_now().await?;
    if let Some(after) = view.take() {
        println!("{}", after.size_line);
    }

    if outcome.is_failure() {
        return Err(anyhow!("Cache was not cleared"));
    }
    Ok(())
}

/// Print the settings panel with the current size.
pub async fn handle_status(app: &App) -> Result<()> {
    let view = LastView::default();
    let panel = SettingsPanel::open(&app.host, &app.store, &view, app.messages, app.now_ms()).await?;
    print_panel(&view)?;

    let config = panel.config();
    if config.enabled {
        match format_schedule(config.next_clear_at) {
            Some(at) => println!("Next scheduled clear: {}", at),
            None => println!("No scheduled clear"),
        }
    }
    println!("Settings: {}", app.paths.settings_file.display());
    println!("Cache:    {}", app.paths.cache_dir.display());
    Ok(())
}

/// Apply one field change, write it through and show the updated panel.
pub async fn handle_set(app: &App, field: &str, value: &str) -> Result<()> {
    let change = match FieldChange::parse(field, value) {
        Ok(change) => change,
        Err(e) => {
            if field == "threshold" {
                app.host.show_notification(Notification::error(
                    app.messages.text(MessageKey::InvalidThresholdNotification),
                ));
            }
            return Err(e.into());
        }
    };

    let view = LastView::default();
    let now_ms = app.now_ms();
    let mut panel = SettingsPanel::open(&app.host, &app.store, &view, app.messages, now_ms).await?;
    panel.change(change, now_ms)?;
    print_panel(&view)
}

/// Register the menu entries and list them.
pub fn handle_menu(app: &App) -> Result<()> {
    let mut menu = StaticMenu::new();
    register_menu_entry(&mut menu, &app.host, &app.messages)?;
    for (title, action) in menu.entries() {
        println!("{} -> {:?}", title, action);
    }
    Ok(())
}

fn print_panel(view: &LastView) -> Result<()> {
    let view = view
        .take()
        .ok_or_else(|| Error::Host("panel was never rendered".to_string()))?;
    ConsoleRenderer.render(&view)?;
    Ok(())
}
