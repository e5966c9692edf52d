//! Color picking core: color values, text formats, clipboard round-trips,
//! recently picked colors, and the status-item click logic.

pub mod clipboard;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod menu;
pub mod parse;
pub mod recent;
pub mod session;

pub use clipboard::{ClipboardProvider, MemoryClipboard, SystemClipboard};
pub use color::{Color, HslValue, LchValue};
pub use config::Settings;
pub use dispatch::{dispatch, Action, ClickActionMode, InputEvent};
pub use error::{ClipboardError, ColorParseError, ConfigError, Error};
pub use format::{serialize, ColorFormat, FormatCache};
pub use menu::MenuEntry;
pub use parse::{detect, parse, parse_as};
pub use recent::{RecentColors, SharedRecentColors, RECENT_COLORS_CAPACITY};
pub use session::Session;
