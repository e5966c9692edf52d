//! What a click on the status item does.

use serde::{Deserialize, Serialize};

/// User-configured behavior of the status item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClickActionMode {
    #[default]
    #[serde(rename = "showMenu")]
    ShowMenuOnClick,
    #[serde(rename = "showColorSampler")]
    ShowColorSamplerOnClick,
    #[serde(rename = "toggleWindow")]
    ToggleWindowOnClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    LeftClick,
    RightClick,
}

/// The side effect the host should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    OpenPicker,
    ToggleWindow,
    ShowMenu,
}

/// Map a click on the status item to an action.
///
/// The mode and the event alone decide the result; nothing is remembered
/// between calls.
pub const fn dispatch(mode: ClickActionMode, event: InputEvent) -> Action {
    use Action::*;
    use ClickActionMode::*;
    use InputEvent::*;

    match (mode, event) {
        (ShowMenuOnClick, LeftClick) => ShowMenu,
        (ShowMenuOnClick, RightClick) => OpenPicker,
        (ShowColorSamplerOnClick, LeftClick) => OpenPicker,
        (ShowColorSamplerOnClick, RightClick) => ShowMenu,
        (ToggleWindowOnClick, LeftClick) => ToggleWindow,
        (ToggleWindowOnClick, RightClick) => ShowMenu,
    }
}
