//! Persisted settings.
//!
//! Stored as pretty JSON under the user's config directory. A missing or
//! unreadable file is never fatal; callers fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::dispatch::ClickActionMode;
use crate::error::ConfigError;
use crate::format::ColorFormat;
use crate::recent::RECENT_COLORS_CAPACITY;

const APP_NAME: &str = "chroma-pick";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "menuBarItemClickAction")]
    pub click_action: ClickActionMode,
    pub preferred_color_format: ColorFormat,
    pub copy_color_after_picking: bool,
    /// Oldest first.
    pub recently_picked_colors: Vec<Color>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            click_action: ClickActionMode::default(),
            preferred_color_format: ColorFormat::default(),
            copy_color_after_picking: false,
            recently_picked_colors: Vec::with_capacity(RECENT_COLORS_CAPACITY),
        }
    }
}

/// Where settings live: `<config dir>/chroma-pick/config.json`.
///
/// Falls back to the working directory when the platform has no config dir.
pub fn config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_NAME).join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}

pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    let data = fs::read_to_string(path).map_err(io_error(path))?;
    let settings = serde_json::from_str(&data).map_err(|source| ConfigError::Deserialize {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "settings loaded");
    Ok(settings)
}

/// Load settings, returning defaults when the file is absent or broken.
pub fn load_or_default(path: &Path) -> Settings {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Settings::default();
    }
    load_from(path).unwrap_or_else(|e| {
        warn!("settings load failed, using defaults: {e}");
        Settings::default()
    })
}

/// Write settings atomically (temp file, then rename).
pub fn save_to(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    let data = serde_json::to_string_pretty(settings).map_err(ConfigError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &data).map_err(io_error(&tmp_path))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        warn!("atomic rename failed ({e}), falling back to direct write");
        fs::write(path, &data).map_err(io_error(path))?;
    }

    debug!(path = %path.display(), "settings saved");
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}
