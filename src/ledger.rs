//! Reputation ledger: task completions, decay, and score arithmetic.
//!
//! Scores saturate at both ends of `[0, SCORE_CEILING]`. How many points an
//! event is worth is decided by a [`ScorePolicy`], so the formula can be swapped
//! without touching the stored records.

use crate::address;
use crate::agent::{load_profile, save_profile, AgentProfile};
use crate::error::LedgerError;
use crate::protocol::ProtocolParams;
use crate::store::Slots;
use crate::types::{Identity, Timestamp, MAX_MULTIPLIER, MIN_DECAY_INTERVAL, SCORE_CEILING};
use crate::validation::{validate_task_id, validate_uri};
use serde::{Deserialize, Serialize};

/// Proof that `agent` completed `task_id`; at most one per pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub agent: Identity,
    pub task_id: String,
    pub proof_uri: String,
    pub reputation_earned: u64,
    pub completed_at: Timestamp,
    pub bump: u8,
}

/// Score formula
pub trait ScorePolicy: Send + Sync {
    /// Points granted for one completed task
    fn task_reward(&self, params: &ProtocolParams) -> u64;

    /// Points removed by one decay cycle
    fn decay_amount(&self, params: &ProtocolParams) -> u64;

    /// Signed score movement caused by a vouch of `amount`
    fn vouch_delta(&self, amount: u64, is_positive: bool, params: &ProtocolParams) -> i64;
}

/// Default formula.
///
/// - task: `+reward_amount`
/// - decay: `-decay_rate`
/// - vouch: `±min(amount / min_stake, MAX_MULTIPLIER)` (integer division; 0 when `min_stake` is 0)
#[derive(Debug, Clone, Copy, Default)]
pub struct StakeWeightedPolicy;

impl ScorePolicy for StakeWeightedPolicy {
    fn task_reward(&self, params: &ProtocolParams) -> u64 {
        params.reward_amount
    }

    fn decay_amount(&self, params: &ProtocolParams) -> u64 {
        params.decay_rate
    }

    fn vouch_delta(&self, amount: u64, is_positive: bool, params: &ProtocolParams) -> i64 {
        let weight = amount
            .checked_div(params.min_stake)
            .unwrap_or(0)
            .min(MAX_MULTIPLIER) as i64;
        if is_positive {
            weight
        } else {
            -weight
        }
    }
}

pub fn add_capped(score: u64, points: u64) -> u64 {
    score.saturating_add(points).min(SCORE_CEILING)
}

pub fn sub_floored(score: u64, points: u64) -> u64 {
    score.saturating_sub(points)
}

/// Apply a signed delta, clamped to `[0, SCORE_CEILING]`
pub fn apply_delta(score: u64, delta: i64) -> u64 {
    if delta >= 0 {
        add_capped(score, delta.unsigned_abs())
    } else {
        sub_floored(score, delta.unsigned_abs()).min(SCORE_CEILING)
    }
}

pub fn complete_task(
    slots: &mut Slots<'_>,
    policy: &dyn ScorePolicy,
    params: &ProtocolParams,
    identity: &Identity,
    task_id: &str,
    proof_uri: &str,
    now: Timestamp,
) -> Result<(AgentProfile, TaskRecord), LedgerError> {
    validate_task_id(task_id)?;
    validate_uri(proof_uri)?;

    let mut profile = load_profile(slots, identity)?;
    let (task_address, bump) = address::task_address(identity, task_id)?;
    if slots.exists(&task_address)? {
        return Err(LedgerError::TaskAlreadyComplete(task_id.to_string()));
    }

    let before = profile.reputation_score;
    profile.reputation_score = add_capped(before, policy.task_reward(params));
    profile.task_count = profile.task_count.saturating_add(1);
    profile.last_activity = now;

    let record = TaskRecord {
        agent: *identity,
        task_id: task_id.to_string(),
        proof_uri: proof_uri.to_string(),
        reputation_earned: profile.reputation_score - before,
        completed_at: now,
        bump,
    };
    slots.save(&task_address, &record)?;
    save_profile(slots, &profile)?;
    Ok((profile, record))
}

/// Apply one decay cycle to `identity`'s profile
///
/// Permissionless; the interval since the profile's last activity or decay is
/// the only gate.
pub fn decay(
    slots: &mut Slots<'_>,
    policy: &dyn ScorePolicy,
    params: &ProtocolParams,
    identity: &Identity,
    now: Timestamp,
) -> Result<AgentProfile, LedgerError> {
    let mut profile = load_profile(slots, identity)?;
    let remaining_secs = profile.decay_wait(now, MIN_DECAY_INTERVAL);
    if remaining_secs > 0 {
        return Err(LedgerError::DecayTooSoon { remaining_secs });
    }

    profile.reputation_score = sub_floored(profile.reputation_score, policy.decay_amount(params));
    profile.last_activity = now;
    save_profile(slots, &profile)?;
    Ok(profile)
}
