//! The interactive settings panel and its menu entry.

use super::fields::{apply_field_change, FieldChange};
use super::view::{PanelRenderer, PanelState, PanelView, SizeReadout};
use crate::clear::{ClearOrchestrator, ClearOutcome, ClearTrigger};
use crate::config::{Configuration, PollPolicy, SettingsBackend, SettingsStore};
use crate::errors::Result;
use crate::host::{HostEnv, MenuAction, MenuRegistry, Notification, Notifier};
use crate::i18n::{MessageKey, Messages};
use std::time::Duration;
use tokio::time::sleep;

/// Pause between a manual clear and the size refresh that follows it.
pub const REFRESH_DELAY: Duration = Duration::from_millis(1500);

/// How long a menu registration failure stays on screen.
pub const LOAD_ERROR_DURATION: Duration = Duration::from_secs(10);

/// An open settings panel.
///
/// Every edit is written through to the store before the panel re-renders.
pub struct SettingsPanel<'a, H, B, R> {
    host: &'a H,
    store: &'a SettingsStore<B>,
    renderer: &'a R,
    messages: Messages,
    policy: PollPolicy,
    state: PanelState,
}

impl<'a, H, B, R> SettingsPanel<'a, H, B, R>
where
    H: HostEnv,
    B: SettingsBackend,
    R: PanelRenderer,
{
    /// Load settings, render, then fetch and show the cache size.
    pub async fn open(
        host: &'a H,
        store: &'a SettingsStore<B>,
        renderer: &'a R,
        messages: Messages,
        now_ms: i64,
    ) -> Result<Self> {
        let config = store.load(now_ms);
        let mut panel = Self {
            host,
            store,
            renderer,
            messages,
            policy: PollPolicy::single_check(),
            state: PanelState::new(config),
        };
        panel.refresh_size().await?;
        Ok(panel)
    }

    /// Poll policy used by the "Clear cache" button.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn config(&self) -> &Configuration {
        &self.state.config
    }

    pub fn view(&self) -> PanelView {
        PanelView::build(&self.state, &self.messages)
    }

    /// Re-measure the cache and show the result.
    pub async fn refresh_size(&mut self) -> Result<()> {
        self.state.readout = SizeReadout::Fetching;
        self.render()?;

        self.state.readout = match self.host.cache_stats().await {
            Ok(stats) => SizeReadout::Size(stats.current_size_mb),
            Err(e) => {
                tracing::error!(error = %e, "Error getting cache stats for panel");
                SizeReadout::Error
            }
        };
        self.render()
    }

    /// Apply one edit: reload, modify, save, re-render.
    pub fn change(&mut self, change: FieldChange, now_ms: i64) -> Result<()> {
        let field = change.field();
        let mut config = self.store.load(now_ms);
        apply_field_change(&mut config, change, now_ms);
        self.store.save(&config)?;
        tracing::debug!(field = field.key(), "Saved settings change");

        self.state.config = config;
        self.render()
    }

    /// The "Clear cache" button.
    pub async fn clear_now(&mut self) -> Result<ClearOutcome> {
        self.state.readout = SizeReadout::Clearing;
        self.state.clear_enabled = false;
        self.render()?;

        let outcome = ClearOrchestrator::new(self.host, self.messages, self.policy.clone())
            .run_clear(ClearTrigger::Manual, self.state.config.notify)
            .await;

        sleep(REFRESH_DELAY).await;
        self.state.clear_enabled = true;
        self.refresh_size().await?;
        Ok(outcome)
    }

    fn render(&self) -> Result<()> {
        self.renderer.render(&self.view())
    }
}

/// Put "Cache config" into the host menu.
///
/// On failure the user gets an error notification for
/// [`LOAD_ERROR_DURATION`]; the error is returned as well.
pub fn register_menu_entry<M, N>(menu: &mut M, notifier: &N, messages: &Messages) -> Result<()>
where
    M: MenuRegistry,
    N: Notifier,
{
    let title = messages.text(MessageKey::MenuTitle);
    match menu.register_entry(title, MenuAction::OpenSettings) {
        Ok(()) => {
            tracing::info!(title, "Menu entry registered");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to register menu entry");
            notifier.show_notification(
                Notification::error(
                    messages.format(MessageKey::LoadErrorNotification, &[&e.to_string()]),
                )
                .with_duration(LOAD_ERROR_DURATION),
            );
            Err(e)
        }
    }
}
