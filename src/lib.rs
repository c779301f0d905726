//! Reputation Ledger: Deterministic Reputation Accounting for Agents
//!
//! A transactional ledger that registers agent profiles, rewards completed tasks,
//! escrows staked vouches, and decays idle scores. All records live in slots at
//! addresses derived from their identifying seeds, and every operation commits
//! atomically.

pub mod address;
pub mod agent;
pub mod clock;
pub mod config;
pub mod custody;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod protocol;
pub mod store;
pub mod tooling;
pub mod types;
pub mod validation;
pub mod vouch;

pub use agent::AgentProfile;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::ReputationEngine;
pub use error::{ErrorCategory, LedgerError, StorageError};
pub use ledger::TaskRecord;
pub use protocol::{ProtocolConfig, ProtocolParams};
pub use store::{MemoryStore, SledSlotStore, SlotStore};
pub use types::{Address, Identity, ReputationTier, Timestamp};
pub use vouch::{Disposition, LockupWithdrawal, StakeVault, VouchRecord, VouchResolver, VouchStatus};
