//! Agent profile record.

use crate::types::{Identity, ReputationTier, Timestamp};
use serde::{Deserialize, Serialize};

/// Reputation profile of one agent, stored at the identity's derived address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub owner: Identity,
    pub name: String,
    pub metadata_uri: String,
    /// Always within `[0, SCORE_CEILING]`
    pub reputation_score: u64,
    pub task_count: u64,
    pub vouch_count: u64,
    pub positive_vouches: u64,
    pub negative_vouches: u64,
    /// Stake currently escrowed in vaults backing this agent
    pub staked_amount: u64,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
    pub bump: u8,
}

impl AgentProfile {
    pub fn tier(&self) -> ReputationTier {
        ReputationTier::from_score(self.reputation_score)
    }

    /// Seconds until decay may next be applied at `now`; zero when allowed
    pub fn decay_wait(&self, now: Timestamp, interval: i64) -> i64 {
        let elapsed = now.saturating_sub(self.last_activity);
        interval.saturating_sub(elapsed).max(0)
    }
}
