use std::path::PathBuf;

/// Why a piece of text could not be read as a color.
///
/// Callers on the paste path collapse this into "no color available";
/// it never aborts anything.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("unrecognized color format: {0}")]
    UnknownFormat(String),

    #[error("invalid hex digits: {0}")]
    InvalidHex(String),

    #[error("invalid hex length: {0} digits (expected 3, 4, 6 or 8)")]
    InvalidLength(usize),

    #[error("{function}() takes {expected} arguments, found {found}")]
    ArgumentCount {
        function: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("component out of range: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color format: {0} (expected hex, hsl, rgb or lch)")]
pub struct UnknownFormat(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("config parse error at {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ColorParseError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
