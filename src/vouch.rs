//! Vouch engine: staked endorsements and their escrow vaults.
//!
//! A vouch is addressed by the ordered pair (voucher, target), so each voucher
//! holds at most one record per target. The stake moves from the voucher's
//! custody into a vault created in the same transaction as the record.
//!
//! Records leave the `Active` state only through [`resolve_vouch`], which hands
//! the decision to a [`VouchResolver`]. The resolver decides who may resolve a
//! vouch and where the vault funds go; the engine only applies the outcome.

use crate::address;
use crate::agent::{load_profile, save_profile, AgentProfile};
use crate::custody::AssetCustody;
use crate::error::LedgerError;
use crate::ledger::{apply_delta, ScorePolicy};
use crate::protocol::ProtocolParams;
use crate::store::Slots;
use crate::types::{Address, Identity, Timestamp, MIN_VOUCHER_SCORE};
use serde::{Deserialize, Serialize};

/// Where a vault's funds go when its vouch is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Back to the voucher
    Release,
    /// Destroyed
    Burn,
    /// Paid to another identity
    Transfer(Identity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VouchStatus {
    Active,
    Resolved {
        disposition: Disposition,
        resolved_at: Timestamp,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VouchRecord {
    pub voucher: Identity,
    pub target: Identity,
    pub amount: u64,
    pub is_positive: bool,
    /// Score movement applied to the target when the vouch was recorded
    pub score_delta: i64,
    pub created_at: Timestamp,
    pub status: VouchStatus,
    pub bump: u8,
}

impl VouchRecord {
    pub fn is_active(&self) -> bool {
        self.status == VouchStatus::Active
    }
}

/// Escrow holding the stake of one vouch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeVault {
    pub vouch: Address,
    pub voucher: Identity,
    pub target: Identity,
    pub balance: u64,
    pub bump: u8,
}

/// Everything a successful vouch produced
#[derive(Debug, Clone, Serialize)]
pub struct VouchReceipt {
    pub record: VouchRecord,
    pub vault: StakeVault,
    pub target: AgentProfile,
}

/// Decides whether `caller` may resolve a vouch now, and where the funds go
pub trait VouchResolver {
    fn resolve(
        &self,
        caller: &Identity,
        record: &VouchRecord,
        now: Timestamp,
    ) -> Result<Disposition, LedgerError>;
}

/// The voucher withdraws their own stake once a lockup period has passed
#[derive(Debug, Clone, Copy)]
pub struct LockupWithdrawal {
    pub lockup_secs: i64,
}

impl VouchResolver for LockupWithdrawal {
    fn resolve(
        &self,
        caller: &Identity,
        record: &VouchRecord,
        now: Timestamp,
    ) -> Result<Disposition, LedgerError> {
        if *caller != record.voucher {
            return Err(LedgerError::InvalidAuthority(format!(
                "only the voucher may withdraw vouch {} -> {}",
                record.voucher.short(),
                record.target.short()
            )));
        }
        let elapsed = now.saturating_sub(record.created_at);
        if elapsed < self.lockup_secs {
            return Err(LedgerError::LockupNotExpired {
                remaining_secs: self.lockup_secs.saturating_sub(elapsed),
            });
        }
        Ok(Disposition::Release)
    }
}

#[allow(clippy::too_many_arguments)]
pub fn vouch(
    slots: &mut Slots<'_>,
    custody: &dyn AssetCustody,
    policy: &dyn ScorePolicy,
    params: &ProtocolParams,
    voucher: &Identity,
    target: &Identity,
    amount: u64,
    is_positive: bool,
    now: Timestamp,
) -> Result<VouchReceipt, LedgerError> {
    if voucher == target {
        return Err(LedgerError::InvalidVouch);
    }
    let voucher_profile = load_profile(slots, voucher)?;
    let mut target_profile = load_profile(slots, target)?;

    if amount < params.min_stake {
        return Err(LedgerError::InvalidStakeAmount {
            amount,
            min_stake: params.min_stake,
        });
    }
    if voucher_profile.reputation_score < MIN_VOUCHER_SCORE {
        return Err(LedgerError::InsufficientReputation {
            score: voucher_profile.reputation_score,
            required: MIN_VOUCHER_SCORE,
        });
    }

    let (vouch_address, vouch_bump) = address::vouch_address(voucher, target)?;
    if slots.exists(&vouch_address)? {
        return Err(LedgerError::VouchAlreadyExists {
            voucher: voucher.to_hex(),
            target: target.to_hex(),
        });
    }
    let (vault_address, vault_bump) = address::stake_address(voucher, target)?;

    custody.debit(slots, voucher, amount)?;
    let vault = StakeVault {
        vouch: vouch_address,
        voucher: *voucher,
        target: *target,
        balance: amount,
        bump: vault_bump,
    };

    let score_delta = policy.vouch_delta(amount, is_positive, params);
    let record = VouchRecord {
        voucher: *voucher,
        target: *target,
        amount,
        is_positive,
        score_delta,
        created_at: now,
        status: VouchStatus::Active,
        bump: vouch_bump,
    };

    target_profile.vouch_count = target_profile.vouch_count.saturating_add(1);
    if is_positive {
        target_profile.positive_vouches = target_profile.positive_vouches.saturating_add(1);
    } else {
        target_profile.negative_vouches = target_profile.negative_vouches.saturating_add(1);
    }
    target_profile.staked_amount = target_profile.staked_amount.saturating_add(amount);
    target_profile.reputation_score = apply_delta(target_profile.reputation_score, score_delta);

    slots.save(&vault_address, &vault)?;
    slots.save(&vouch_address, &record)?;
    save_profile(slots, &target_profile)?;

    Ok(VouchReceipt {
        record,
        vault,
        target: target_profile,
    })
}

/// Move an active vouch to its terminal state and empty its vault
///
/// The score movement the vouch caused is kept.
pub fn resolve_vouch(
    slots: &mut Slots<'_>,
    custody: &dyn AssetCustody,
    resolver: &dyn VouchResolver,
    caller: &Identity,
    voucher: &Identity,
    target: &Identity,
    now: Timestamp,
) -> Result<VouchRecord, LedgerError> {
    let (vouch_address, _) = address::vouch_address(voucher, target)?;
    let mut record: VouchRecord =
        slots
            .load(&vouch_address)?
            .ok_or_else(|| LedgerError::VouchNotFound {
                voucher: voucher.to_hex(),
                target: target.to_hex(),
            })?;
    if !record.is_active() {
        return Err(LedgerError::VouchNotActive {
            voucher: voucher.to_hex(),
            target: target.to_hex(),
        });
    }

    let disposition = resolver.resolve(caller, &record, now)?;

    let (vault_address, _) = address::stake_address(voucher, target)?;
    let mut vault: StakeVault =
        slots
            .load(&vault_address)?
            .ok_or_else(|| LedgerError::VouchNotFound {
                voucher: voucher.to_hex(),
                target: target.to_hex(),
            })?;
    let released = vault.balance;
    match disposition {
        Disposition::Release => {
            custody.credit(slots, voucher, released)?;
        }
        Disposition::Transfer(recipient) => {
            custody.credit(slots, &recipient, released)?;
        }
        Disposition::Burn => {}
    }
    vault.balance = 0;

    let mut target_profile = load_profile(slots, target)?;
    target_profile.staked_amount = target_profile.staked_amount.saturating_sub(released);

    record.status = VouchStatus::Resolved {
        disposition,
        resolved_at: now,
    };
    slots.save(&vault_address, &vault)?;
    slots.save(&vouch_address, &record)?;
    save_profile(slots, &target_profile)?;
    Ok(record)
}

pub fn load_vouch(
    slots: &mut Slots<'_>,
    voucher: &Identity,
    target: &Identity,
) -> Result<Option<VouchRecord>, LedgerError> {
    let (address, _) = address::vouch_address(voucher, target)?;
    slots.load(&address)
}

pub fn load_vault(
    slots: &mut Slots<'_>,
    voucher: &Identity,
    target: &Identity,
) -> Result<Option<StakeVault>, LedgerError> {
    let (address, _) = address::stake_address(voucher, target)?;
    slots.load(&address)
}
