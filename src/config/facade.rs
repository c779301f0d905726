//! ConfigLoader facade delegating to merge service.

use super::merge::MergeService;
use super::LedgerSettings;
use crate::error::SettingsError;
use std::path::Path;

/// Settings loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from files around `dir` and the environment.
    pub fn load(dir: &Path) -> Result<LedgerSettings, SettingsError> {
        Ok(MergeService::load(dir)?)
    }

    /// Load settings from a specific file.
    pub fn load_from_file(path: &Path) -> Result<LedgerSettings, SettingsError> {
        Ok(MergeService::load_from_file(path)?)
    }

    /// Explicit file when given, otherwise the standard sources around `dir`.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<LedgerSettings, SettingsError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load(dir),
        }
    }
}
