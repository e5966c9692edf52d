//! Copy-as-format and paste-with-detection on top of a plain-text clipboard.

use std::time::Duration;

use tracing::{debug, warn};

use crate::color::Color;
use crate::error::ClipboardError;
use crate::format::{serialize, ColorFormat};
use crate::parse::detect;

/// Plain-text clipboard the round-trip operations talk to.
pub trait ClipboardProvider {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Current text contents, `None` when empty or not text.
    fn read(&mut self) -> Option<String>;
}

impl<T: ClipboardProvider + ?Sized> ClipboardProvider for Box<T> {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write(text)
    }

    fn read(&mut self) -> Option<String> {
        (**self).read()
    }
}

/// The system clipboard, backed by `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    linger: Duration,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self {
            inner,
            linger: Duration::ZERO,
        })
    }

    /// On Linux the clipboard is owned by the writing process. Serve requests
    /// for up to `linger` after each write so short-lived hosts (the CLI) do
    /// not lose what they copied.
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }
}

impl ClipboardProvider for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        use arboard::SetExtLinux;

        let result = if self.linger.is_zero() {
            self.inner.set_text(text.to_owned())
        } else {
            let deadline = std::time::Instant::now() + self.linger;
            self.inner.set().wait_until(deadline).text(text.to_owned())
        };
        result.map_err(|e| ClipboardError::Write(e.to_string()))
    }

    #[cfg(not(target_os = "linux"))]
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }

    fn read(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                warn!("clipboard read failed: {e}");
                None
            }
        }
    }
}

/// In-process clipboard for headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: Option<String>,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            writes: 0,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }

    fn read(&mut self) -> Option<String> {
        self.text.clone()
    }
}

/// Put `color` on the clipboard as `format` text.
///
/// A failing clipboard is logged and otherwise ignored.
pub fn copy_as(clipboard: &mut impl ClipboardProvider, color: &Color, format: ColorFormat) {
    copy_text(clipboard, &serialize(color, format));
}

pub(crate) fn copy_text(clipboard: &mut impl ClipboardProvider, text: &str) {
    match clipboard.write(text) {
        Ok(()) => debug!(text, "copied to clipboard"),
        Err(e) => warn!("copy failed: {e}"),
    }
}

/// Read the clipboard and parse it as a color in any known format.
///
/// Returns `None` when the clipboard is empty or holds something else.
pub fn paste(clipboard: &mut impl ClipboardProvider) -> Option<Color> {
    let text = clipboard.read()?;
    let (format, color) = detect(&text).ok()?;
    debug!(%format, "pasted color");
    Some(color)
}

/// Whether [`paste`] would currently produce a color.
pub fn can_paste(clipboard: &mut impl ClipboardProvider) -> bool {
    paste(clipboard).is_some()
}
