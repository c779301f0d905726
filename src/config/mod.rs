//! Runtime settings
//!
//! Operator-facing settings for the `repledger` binary: where the store lives,
//! the parameters `init` proposes, the withdrawal lockup, and logging. These
//! are distinct from the on-ledger protocol config, which is immutable once
//! created.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::SettingsError;
use crate::logging::LoggingConfig;
use crate::protocol::ProtocolParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub storage: StorageConfig,
    pub protocol: ProtocolDefaults,
    pub vouch: VouchSettings,
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Sled database directory; None uses the platform data directory
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(paths::data_dir()?.join("ledger")),
        }
    }
}

/// Parameters proposed by `repledger init` unless overridden on the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolDefaults {
    pub min_stake: u64,
    pub decay_rate: u64,
    pub reward_amount: u64,
}

impl Default for ProtocolDefaults {
    fn default() -> Self {
        Self {
            min_stake: 1_000_000_000,
            decay_rate: 10,
            reward_amount: 100,
        }
    }
}

impl ProtocolDefaults {
    pub fn to_params(&self) -> ProtocolParams {
        ProtocolParams {
            min_stake: self.min_stake,
            decay_rate: self.decay_rate,
            reward_amount: self.reward_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VouchSettings {
    /// Seconds a stake stays locked before the voucher may withdraw it
    pub lockup_secs: i64,
}

impl Default for VouchSettings {
    fn default() -> Self {
        Self {
            lockup_secs: 7 * 86_400,
        }
    }
}
