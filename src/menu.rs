//! Contents of the status-item menu.
//!
//! Only the model lives here; drawing it is the host's job.

use crate::color::Color;
use crate::dispatch::ClickActionMode;
use crate::format::ColorFormat;

pub const RECENT_COLORS_HEADER: &str = "Recently Picked Colors";

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    PickColor,
    ToggleWindow,
    Header(&'static str),
    /// Activating it copies `label`.
    RecentColor { color: Color, label: String },
    Settings,
    SendFeedback,
    Quit,
    Separator,
}

/// Build the menu for `mode`, listing `recent` (most-recent-first) in the
/// preferred format.
///
/// An action already bound to the left click is left out of the menu.
pub fn entries(
    mode: ClickActionMode,
    recent: impl IntoIterator<Item = Color>,
    preferred: ColorFormat,
) -> Vec<MenuEntry> {
    let mut menu = Vec::new();

    if mode != ClickActionMode::ShowColorSamplerOnClick {
        menu.push(MenuEntry::PickColor);
    }
    if mode != ClickActionMode::ToggleWindowOnClick {
        menu.push(MenuEntry::ToggleWindow);
    }
    menu.push(MenuEntry::Separator);

    let mut recent = recent.into_iter().peekable();
    if recent.peek().is_some() {
        menu.push(MenuEntry::Header(RECENT_COLORS_HEADER));
        menu.extend(recent.map(|color| MenuEntry::RecentColor {
            color,
            label: color.string_representation(preferred),
        }));
    }

    menu.extend([
        MenuEntry::Separator,
        MenuEntry::Settings,
        MenuEntry::Separator,
        MenuEntry::SendFeedback,
        MenuEntry::Separator,
        MenuEntry::Quit,
    ]);
    menu
}
