//! The application context a host builds once at startup.
//!
//! A [`Session`] owns the settings, the recent-colors history, the color
//! currently shown in the panel, and the clipboard. Hosts forward user input
//! to it and perform whatever [`Action`] comes back.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::clipboard::{self, copy_text, ClipboardProvider};
use crate::color::Color;
use crate::config::{self, Settings};
use crate::dispatch::{dispatch, Action, InputEvent};
use crate::format::{ColorFormat, FormatCache};
use crate::menu::{self, MenuEntry};
use crate::recent::{RecentColors, SharedRecentColors};

pub struct Session<C: ClipboardProvider> {
    settings: Settings,
    recent: SharedRecentColors,
    current: Color,
    cache: FormatCache,
    clipboard: C,
    config_path: Option<PathBuf>,
}

impl<C: ClipboardProvider> Session<C> {
    /// Start a session, hydrating the history from `settings`.
    pub fn new(settings: Settings, clipboard: C) -> Self {
        let recent = RecentColors::hydrate(settings.recently_picked_colors.iter().copied());
        let current = recent.most_recent().unwrap_or_default();

        Self {
            settings,
            recent: SharedRecentColors::new(recent),
            current,
            cache: FormatCache::new(),
            clipboard,
            config_path: None,
        }
    }

    /// Persist settings to `path` every time the history changes.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn current_color(&self) -> Color {
        self.current
    }

    pub fn set_current_color(&mut self, color: Color) {
        if color != self.current {
            self.current = color;
            self.cache.invalidate();
        }
    }

    /// The current color in `format`, memoized until the color changes.
    pub fn formatted(&mut self, format: ColorFormat) -> &str {
        self.cache.get(&self.current, format)
    }

    /// Recent colors, most-recent-first.
    pub fn recent_colors(&self) -> Vec<Color> {
        self.recent.snapshot()
    }

    /// A handle onto the same history, usable from other threads.
    pub fn recent_handle(&self) -> SharedRecentColors {
        self.recent.clone()
    }

    /// Consume the result of one screen sample.
    ///
    /// `None` means the user cancelled; nothing changes. A sampled color
    /// becomes the current color, is recorded and persisted, and is copied
    /// in the preferred format when the user asked for that.
    pub fn pick_color(&mut self, sample: Option<Color>) -> Option<Color> {
        let Some(color) = sample else {
            debug!("color sampling cancelled");
            return None;
        };

        self.set_current_color(color);
        self.recent.record(color);
        self.persist();

        if self.settings.copy_color_after_picking {
            self.copy_as(self.settings.preferred_color_format);
        }
        Some(color)
    }

    /// Copy the current color as `format`.
    pub fn copy_as(&mut self, format: ColorFormat) {
        let text = self.cache.get(&self.current, format);
        copy_text(&mut self.clipboard, text);
    }

    /// Replace the current color with whatever color the clipboard holds.
    ///
    /// Leaves the current color untouched when the clipboard has none.
    pub fn paste_color(&mut self) -> Option<Color> {
        let color = clipboard::paste(&mut self.clipboard)?;
        self.set_current_color(color);
        Some(color)
    }

    pub fn can_paste(&mut self) -> bool {
        clipboard::can_paste(&mut self.clipboard)
    }

    pub fn handle_click(&self, event: InputEvent) -> Action {
        dispatch(self.settings.click_action, event)
    }

    pub fn menu(&self) -> Vec<MenuEntry> {
        menu::entries(
            self.settings.click_action,
            self.recent.snapshot(),
            self.settings.preferred_color_format,
        )
    }

    /// React to a chosen menu entry.
    ///
    /// Entries that correspond to an [`Action`] return it; a recent color is
    /// copied. Settings, feedback and quit are left to the host.
    pub fn activate(&mut self, entry: &MenuEntry) -> Option<Action> {
        match entry {
            MenuEntry::PickColor => Some(Action::OpenPicker),
            MenuEntry::ToggleWindow => Some(Action::ToggleWindow),
            MenuEntry::RecentColor { label, .. } => {
                copy_text(&mut self.clipboard, label);
                None
            }
            _ => None,
        }
    }

    fn persist(&mut self) {
        self.settings.recently_picked_colors = self.recent.to_persisted();

        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = config::save_to(&self.settings, path) {
            warn!("failed to persist recent colors: {e}");
        }
    }
}
