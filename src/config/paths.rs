//! XDG Base Directory locations for ledger data and config.

use crate::error::SettingsError;
use std::path::PathBuf;

const APP_DIR: &str = "repledger";

/// Returns `$XDG_DATA_HOME` if set, otherwise `$HOME/.local/share`
pub fn data_home() -> Option<PathBuf> {
    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        if !xdg_data_home.is_empty() {
            return Some(PathBuf::from(xdg_data_home));
        }
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local").join("share"))
}

/// Returns `$XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`
pub fn config_home() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Some(PathBuf::from(xdg_config_home));
        }
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config"))
}

/// `$XDG_DATA_HOME/repledger`, falling back to the platform data directory
pub fn data_dir() -> Result<PathBuf, SettingsError> {
    if let Some(home) = data_home() {
        return Ok(home.join(APP_DIR));
    }
    directories::ProjectDirs::from("", "", APP_DIR)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            SettingsError::ConfigError(
                "Could not determine a data directory for the ledger store".to_string(),
            )
        })
}

/// `$XDG_CONFIG_HOME/repledger/config.toml`, if a config home is known
pub fn global_config_file() -> Option<PathBuf> {
    config_home().map(|home| home.join(APP_DIR).join("config.toml"))
}
