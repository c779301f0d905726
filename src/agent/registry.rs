//! Identity registry: one profile per identity.

use crate::address;
use crate::agent::profile::AgentProfile;
use crate::error::LedgerError;
use crate::protocol;
use crate::store::Slots;
use crate::types::{Identity, Timestamp, STARTING_SCORE};
use crate::validation::{validate_agent_name, validate_uri};

/// Create the profile for `identity`
///
/// The profile address is derived from the identity alone, so a second
/// registration lands on the same slot and fails with `AlreadyRegistered`.
pub fn register_agent(
    slots: &mut Slots<'_>,
    identity: &Identity,
    name: &str,
    metadata_uri: &str,
    now: Timestamp,
) -> Result<AgentProfile, LedgerError> {
    validate_agent_name(name)?;
    validate_uri(metadata_uri)?;

    let (address, bump) = address::agent_address(identity)?;
    if slots.exists(&address)? {
        return Err(LedgerError::AlreadyRegistered(identity.to_hex()));
    }
    protocol::record_registration(slots)?;

    let profile = AgentProfile {
        owner: *identity,
        name: name.to_string(),
        metadata_uri: metadata_uri.to_string(),
        reputation_score: STARTING_SCORE,
        task_count: 0,
        vouch_count: 0,
        positive_vouches: 0,
        negative_vouches: 0,
        staked_amount: 0,
        last_activity: now,
        created_at: now,
        bump,
    };
    slots.save(&address, &profile)?;
    Ok(profile)
}

/// Load the profile for `identity` or fail with `NotRegistered`
pub fn load_profile(slots: &mut Slots<'_>, identity: &Identity) -> Result<AgentProfile, LedgerError> {
    let (address, _) = address::agent_address(identity)?;
    slots
        .load::<AgentProfile>(&address)?
        .ok_or_else(|| LedgerError::NotRegistered(identity.to_hex()))
}

pub fn save_profile(slots: &mut Slots<'_>, profile: &AgentProfile) -> Result<(), LedgerError> {
    let (address, _) = address::agent_address(&profile.owner)?;
    slots.save(&address, profile)
}
