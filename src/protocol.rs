//! Protocol configuration
//!
//! The singleton config record is created once by an authority and has no
//! update path. Operations read the tunable parameters through a
//! [`ParameterSource`], so where parameters come from is pluggable without the
//! stored record ever becoming mutable.

use crate::address;
use crate::error::LedgerError;
use crate::store::Slots;
use crate::types::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Tunable protocol parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Smallest stake a vouch may carry, in the asset's smallest unit
    pub min_stake: u64,
    /// Points removed per decay cycle
    pub decay_rate: u64,
    /// Points granted per completed task
    pub reward_amount: u64,
}

/// Singleton protocol config record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    pub authority: Identity,
    pub min_stake: u64,
    pub decay_rate: u64,
    pub reward_amount: u64,
    pub total_agents: u64,
    pub created_at: Timestamp,
    pub bump: u8,
}

impl ProtocolConfig {
    pub fn params(&self) -> ProtocolParams {
        ProtocolParams {
            min_stake: self.min_stake,
            decay_rate: self.decay_rate,
            reward_amount: self.reward_amount,
        }
    }

    pub fn is_authority(&self, caller: &Identity) -> bool {
        self.authority == *caller
    }
}

/// Create the config record. Fails if it already exists.
pub fn initialize(
    slots: &mut Slots<'_>,
    authority: &Identity,
    params: ProtocolParams,
    now: Timestamp,
) -> Result<ProtocolConfig, LedgerError> {
    if params.min_stake == 0 {
        return Err(LedgerError::InvalidStakeAmount {
            amount: 0,
            min_stake: 1,
        });
    }
    let (address, bump) = address::config_address()?;
    if slots.exists(&address)? {
        return Err(LedgerError::AlreadyInitialized);
    }
    let config = ProtocolConfig {
        authority: *authority,
        min_stake: params.min_stake,
        decay_rate: params.decay_rate,
        reward_amount: params.reward_amount,
        total_agents: 0,
        created_at: now,
        bump,
    };
    slots.save(&address, &config)?;
    Ok(config)
}

/// Load the config record or fail with `NotInitialized`
pub fn get(slots: &mut Slots<'_>) -> Result<ProtocolConfig, LedgerError> {
    let (address, _) = address::config_address()?;
    slots
        .load::<ProtocolConfig>(&address)?
        .ok_or(LedgerError::NotInitialized)
}

/// Count one more registered agent
pub(crate) fn record_registration(slots: &mut Slots<'_>) -> Result<ProtocolConfig, LedgerError> {
    let (address, _) = address::config_address()?;
    let mut config = get(slots)?;
    config.total_agents = config.total_agents.saturating_add(1);
    slots.save(&address, &config)?;
    Ok(config)
}

/// Where operations read their tunable parameters from
pub trait ParameterSource: Send + Sync {
    fn params(&self, slots: &mut Slots<'_>) -> Result<ProtocolParams, LedgerError>;
}

/// Parameters read from the stored config record inside the calling transaction
pub struct StoredParameters;

impl ParameterSource for StoredParameters {
    fn params(&self, slots: &mut Slots<'_>) -> Result<ProtocolParams, LedgerError> {
        Ok(get(slots)?.params())
    }
}

/// Fixed parameters, independent of the stored record
///
/// Registration and authority checks still need the stored record.
pub struct PinnedParameters(pub ProtocolParams);

impl ParameterSource for PinnedParameters {
    fn params(&self, _slots: &mut Slots<'_>) -> Result<ProtocolParams, LedgerError> {
        Ok(self.0)
    }
}
