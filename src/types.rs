//! Core types for the reputation ledger.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address: deterministic slot location produced by the key deriver
pub type Address = [u8; 32];

/// Timestamp: seconds since the Unix epoch, as supplied by the engine clock
pub type Timestamp = i64;

/// Score every profile starts with
pub const STARTING_SCORE: u64 = 1_000;

/// Upper bound of a reputation score
pub const SCORE_CEILING: u64 = 10_000;

/// Cap on the per-vouch score movement
pub const MAX_MULTIPLIER: u64 = 50;

/// Minimum seconds between two decay applications on one profile
pub const MIN_DECAY_INTERVAL: i64 = 86_400;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_TASK_ID_LEN: usize = 100;
pub const MAX_URI_LEN: usize = 200;

/// A voucher below this score cannot endorse or challenge anyone
pub const MIN_VOUCHER_SCORE: u64 = 100;

/// Identity: 32-byte key of an agent or caller, as supplied by the signing provider
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Identity(bytes)
    }

    /// Derive a stable identity from a human label.
    ///
    /// Used by the CLI and tests for development identities; production callers
    /// pass real public keys.
    pub fn from_label(label: &str) -> Self {
        let hash = blake3::derive_key("reputation-ledger dev identity v1", label.as_bytes());
        Identity(hash)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Shortened hex for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.short())
    }
}

impl FromStr for Identity {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut bytes)?;
        Ok(Identity(bytes))
    }
}

// Hex in human-readable formats, raw bytes in bincode
impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Identity)
        }
    }
}

/// Display tier derived from a reputation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReputationTier {
    Low,
    Medium,
    High,
}

impl ReputationTier {
    pub fn from_score(score: u64) -> Self {
        if score >= 7_000 {
            ReputationTier::High
        } else if score >= 4_000 {
            ReputationTier::Medium
        } else {
            ReputationTier::Low
        }
    }
}

impl fmt::Display for ReputationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReputationTier::Low => "low",
            ReputationTier::Medium => "medium",
            ReputationTier::High => "high",
        };
        f.write_str(label)
    }
}
