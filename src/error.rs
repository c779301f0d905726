//! Error types for the reputation ledger.

use thiserror::Error;

/// Storage substrate errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Failed to encode or decode slot {slot}: {source}")]
    Codec {
        slot: String,
        #[source]
        source: bincode::Error,
    },

    #[error("Transaction gave up after {attempts} conflicting attempts")]
    Contention { attempts: usize },

    #[error("Concurrent transaction conflict")]
    Conflict,

    #[error("Transaction committed without producing a result")]
    NoResult,

    #[error("Store schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
}

/// Settings and logging setup errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Broad classification of ledger failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad caller input
    Validation,
    /// Target slot already populated
    Conflict,
    /// Expected state is absent
    NotFound,
    /// Caller lacks rights
    Authorization,
    /// Business-rule gate; may pass later or with other inputs
    Policy,
    /// Storage, codec or derivation failure
    System,
}

/// Errors surfaced by every ledger operation
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Stake amount {amount} below minimum {min_stake}")]
    InvalidStakeAmount { amount: u64, min_stake: u64 },

    #[error("Agent already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Agent not found: {0}")]
    NotRegistered(String),

    #[error("Cannot vouch for self")]
    InvalidVouch,

    #[error("Reputation too low for action: score {score}, required {required}")]
    InsufficientReputation { score: u64, required: u64 },

    #[error("Decay called too early: {remaining_secs}s until next decay")]
    DecayTooSoon { remaining_secs: i64 },

    #[error("Task already marked complete: {0}")]
    TaskAlreadyComplete(String),

    #[error("Unauthorized action: {0}")]
    InvalidAuthority(String),

    #[error("Stake amount too low: balance {balance}, required {required}")]
    InsufficientStake { balance: u64, required: u64 },

    #[error("Vouch record does not exist: {voucher} -> {target}")]
    VouchNotFound { voucher: String, target: String },

    #[error("Protocol already initialized")]
    AlreadyInitialized,

    #[error("Protocol not initialized")]
    NotInitialized,

    #[error("Agent name too long: {len} bytes (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("Agent name must not be blank")]
    InvalidName,

    #[error("URI too long: {len} bytes (max {max})")]
    UriTooLong { len: usize, max: usize },

    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),

    #[error("Vouch already exists: {voucher} -> {target}")]
    VouchAlreadyExists { voucher: String, target: String },

    #[error("Vouch already resolved: {voucher} -> {target}")]
    VouchNotActive { voucher: String, target: String },

    #[error("Vouch lockup not expired: {remaining_secs}s remaining")]
    LockupNotExpired { remaining_secs: i64 },

    #[error("Balance overflow crediting {owner}")]
    BalanceOverflow { owner: String },

    #[error("No valid address for tag '{0}' after exhausting all discriminants")]
    AddressDerivationExhausted(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::InvalidStakeAmount { .. }
            | LedgerError::InvalidVouch
            | LedgerError::NameTooLong { .. }
            | LedgerError::InvalidName
            | LedgerError::UriTooLong { .. }
            | LedgerError::InvalidTaskId(_)
            | LedgerError::BalanceOverflow { .. } => ErrorCategory::Validation,
            LedgerError::AlreadyRegistered(_)
            | LedgerError::TaskAlreadyComplete(_)
            | LedgerError::AlreadyInitialized
            | LedgerError::VouchAlreadyExists { .. } => ErrorCategory::Conflict,
            LedgerError::NotRegistered(_)
            | LedgerError::VouchNotFound { .. }
            | LedgerError::NotInitialized => ErrorCategory::NotFound,
            LedgerError::InvalidAuthority(_) => ErrorCategory::Authorization,
            LedgerError::InsufficientReputation { .. }
            | LedgerError::InsufficientStake { .. }
            | LedgerError::DecayTooSoon { .. }
            | LedgerError::VouchNotActive { .. }
            | LedgerError::LockupNotExpired { .. } => ErrorCategory::Policy,
            LedgerError::AddressDerivationExhausted(_) | LedgerError::StorageError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// Stable numeric code for the boundary error kinds.
    ///
    /// Kinds outside the published table have no code.
    pub fn code(&self) -> Option<u32> {
        let code = match self {
            LedgerError::InvalidStakeAmount { .. } => 6000,
            LedgerError::AlreadyRegistered(_) => 6001,
            LedgerError::NotRegistered(_) => 6002,
            LedgerError::InvalidVouch => 6003,
            LedgerError::InsufficientReputation { .. } => 6004,
            LedgerError::DecayTooSoon { .. } => 6005,
            LedgerError::TaskAlreadyComplete(_) => 6006,
            LedgerError::InvalidAuthority(_) => 6007,
            LedgerError::InsufficientStake { .. } => 6008,
            LedgerError::VouchNotFound { .. } => 6009,
            _ => return None,
        };
        Some(code)
    }
}
