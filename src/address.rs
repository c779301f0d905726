//! Slot address derivation
//!
//! Maps a namespace tag plus an ordered tuple of byte inputs to a deterministic
//! storage address. Every record in the ledger lives at a derived address, so
//! uniqueness of a record is uniqueness of its derivation inputs.

use crate::error::LedgerError;
use crate::types::{Address, Identity};

const DERIVE_CONTEXT: &str = "reputation-ledger 2026-01 slot derivation";

/// First byte reserved for store metadata keys; derived slots never use it
pub const SYSTEM_PREFIX: u8 = 0xFF;

pub const TAG_CONFIG: &str = "config";
pub const TAG_AGENT: &str = "agent";
pub const TAG_VOUCH: &str = "vouch";
pub const TAG_STAKE: &str = "stake";
pub const TAG_TASK: &str = "task";
pub const TAG_BALANCE: &str = "balance";

/// Derive the address and discriminant for `tag` and `parts`.
///
/// Tag and parts are length-prefixed before hashing, so `["ab", "c"]` and
/// `["a", "bc"]` never share an encoding. The discriminant counts down from 255
/// and the first candidate outside the system prefix wins.
pub fn derive(tag: &str, parts: &[&[u8]]) -> Result<(Address, u8), LedgerError> {
    let mut base = blake3::Hasher::new_derive_key(DERIVE_CONTEXT);
    write_framed(&mut base, tag.as_bytes());
    base.update(&(parts.len() as u32).to_le_bytes());
    for part in parts {
        write_framed(&mut base, part);
    }

    for bump in (0..=u8::MAX).rev() {
        let mut hasher = base.clone();
        hasher.update(&[bump]);
        let candidate: Address = *hasher.finalize().as_bytes();
        if is_valid_slot(&candidate) {
            return Ok((candidate, bump));
        }
    }
    Err(LedgerError::AddressDerivationExhausted(tag.to_string()))
}

fn write_framed(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u32).to_le_bytes());
    hasher.update(bytes);
}

pub fn is_valid_slot(address: &Address) -> bool {
    address[0] != SYSTEM_PREFIX
}

pub fn config_address() -> Result<(Address, u8), LedgerError> {
    derive(TAG_CONFIG, &[])
}

pub fn agent_address(identity: &Identity) -> Result<(Address, u8), LedgerError> {
    derive(TAG_AGENT, &[identity.as_bytes()])
}

pub fn vouch_address(voucher: &Identity, target: &Identity) -> Result<(Address, u8), LedgerError> {
    derive(TAG_VOUCH, &[voucher.as_bytes(), target.as_bytes()])
}

pub fn stake_address(voucher: &Identity, target: &Identity) -> Result<(Address, u8), LedgerError> {
    derive(TAG_STAKE, &[voucher.as_bytes(), target.as_bytes()])
}

pub fn task_address(agent: &Identity, task_id: &str) -> Result<(Address, u8), LedgerError> {
    derive(TAG_TASK, &[agent.as_bytes(), task_id.as_bytes()])
}

pub fn balance_address(owner: &Identity) -> Result<(Address, u8), LedgerError> {
    derive(TAG_BALANCE, &[owner.as_bytes()])
}
