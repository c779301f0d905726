//! MergeService: orchestrates sources and deserializes to LedgerSettings.

use super::sources;
use super::LedgerSettings;
use config::Config;
use config::ConfigError;
use std::path::Path;

/// Merge service for settings composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> `<dir>/repledger.toml` -> environment (highest).
    pub fn load(dir: &Path) -> Result<LedgerSettings, ConfigError> {
        let builder = Config::builder();
        let builder = sources::add_global_file(builder);
        let builder = sources::add_local_file(builder, dir);
        let builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    /// Load settings from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<LedgerSettings, ConfigError> {
        let builder = sources::add_explicit_file(Config::builder(), path);
        let builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }
}
