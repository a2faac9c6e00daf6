//! Terminal-backed host pieces used by the binary.

use super::{
    CacheStats, ClearGateway, DirectoryCache, MenuAction, MenuRegistry, Notification, Notifier,
    StatsGateway,
};
use crate::errors::{Error, Result};
use crate::panel::{PanelRenderer, PanelView};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io::{IsTerminal, Write};

/// Prints notifications to stderr, errors in red.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        colored::control::set_override(color);
        Self { color }
    }

    /// The line a notification prints as.
    pub fn format(&self, notification: &Notification) -> String {
        let message = notification.message.as_str();
        match (notification.is_error, self.color) {
            (true, true) => format!("{} {}", "error:".red().bold(), message.red()),
            (true, false) => format!("error: {}", message),
            (false, true) => format!("{} {}", "::".cyan(), message),
            (false, false) => format!(":: {}", message),
        }
    }
}

impl Default for ConsoleNotifier {
    /// Colors only when stderr is a terminal.
    fn default() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }
}

impl Notifier for ConsoleNotifier {
    fn show_notification(&self, notification: Notification) {
        // Durations mean nothing on a terminal; the line just stays.
        eprintln!("{}", self.format(&notification));
    }
}

/// Draws the settings panel as a table on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn to_table(&self, view: &PanelView) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![Cell::new(&view.title), Cell::new(""), Cell::new("")]);

        for row in &view.rows {
            table.add_row(vec![
                Cell::new(&row.label),
                Cell::new(row.value.display()),
                Cell::new(&row.info),
            ]);
        }

        let button = if view.button_enabled {
            format!("[{}]", view.button_label)
        } else {
            view.button_label.clone()
        };
        table.add_row(vec![Cell::new(&view.size_line), Cell::new(button), Cell::new("")]);
        table
    }
}

impl PanelRenderer for ConsoleRenderer {
    fn render(&self, view: &PanelView) -> Result<()> {
        let mut table = self.to_table(view);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", table)?;
        Ok(())
    }
}

/// Menu that just remembers its entries.
#[derive(Debug, Clone, Default)]
pub struct StaticMenu {
    entries: Vec<(String, MenuAction)>,
}

impl StaticMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(String, MenuAction)] {
        &self.entries
    }
}

impl MenuRegistry for StaticMenu {
    fn register_entry(&mut self, title: &str, action: MenuAction) -> Result<()> {
        if title.trim().is_empty() {
            return Err(Error::Host("menu entry title is empty".to_string()));
        }
        if self.entries.iter().any(|(existing, _)| existing == title) {
            return Err(Error::Host(format!("menu entry '{}' already exists", title)));
        }
        self.entries.push((title.to_string(), action));
        Ok(())
    }
}

/// A cache directory on disk plus a terminal for notifications.
#[derive(Debug, Clone)]
pub struct LocalHost {
    cache: DirectoryCache,
    notifier: ConsoleNotifier,
}

impl LocalHost {
    pub fn new(cache: DirectoryCache, notifier: ConsoleNotifier) -> Self {
        Self { cache, notifier }
    }

    pub fn cache(&self) -> &DirectoryCache {
        &self.cache
    }
}

impl StatsGateway for LocalHost {
    async fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.cache_stats().await
    }
}

impl ClearGateway for LocalHost {
    async fn delete_unlocked_items(&self) -> Result<()> {
        self.cache.delete_unlocked_items().await
    }
}

impl Notifier for LocalHost {
    fn show_notification(&self, notification: Notification) {
        self.notifier.show_notification(notification);
    }
}
