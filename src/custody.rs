//! Asset custody
//!
//! Moves the staking asset between holders and vaults. The slot-backed custody
//! keeps holder balances in the same store as the ledger records, so an escrow
//! debit commits or rolls back together with the vouch that caused it.

use crate::address;
use crate::error::LedgerError;
use crate::store::Slots;
use crate::types::Identity;
use serde::{Deserialize, Serialize};

pub trait AssetCustody: Send + Sync {
    fn balance(&self, slots: &mut Slots<'_>, owner: &Identity) -> Result<u64, LedgerError>;

    /// Add `amount` to `owner`; returns the new balance
    fn credit(&self, slots: &mut Slots<'_>, owner: &Identity, amount: u64)
        -> Result<u64, LedgerError>;

    /// Take `amount` from `owner`; fails with `InsufficientStake` when short
    fn debit(&self, slots: &mut Slots<'_>, owner: &Identity, amount: u64)
        -> Result<u64, LedgerError>;
}

/// Holder balance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub owner: Identity,
    pub amount: u64,
    pub bump: u8,
}

/// Custody over `balance` slots in the ledger store
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotCustody;

impl SlotCustody {
    fn load(slots: &mut Slots<'_>, owner: &Identity) -> Result<Balance, LedgerError> {
        let (address, bump) = address::balance_address(owner)?;
        Ok(slots.load(&address)?.unwrap_or(Balance {
            owner: *owner,
            amount: 0,
            bump,
        }))
    }

    fn store(slots: &mut Slots<'_>, balance: &Balance) -> Result<(), LedgerError> {
        let (address, _) = address::balance_address(&balance.owner)?;
        slots.save(&address, balance)
    }
}

impl AssetCustody for SlotCustody {
    fn balance(&self, slots: &mut Slots<'_>, owner: &Identity) -> Result<u64, LedgerError> {
        Ok(Self::load(slots, owner)?.amount)
    }

    fn credit(
        &self,
        slots: &mut Slots<'_>,
        owner: &Identity,
        amount: u64,
    ) -> Result<u64, LedgerError> {
        let mut balance = Self::load(slots, owner)?;
        balance.amount = balance
            .amount
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                owner: owner.to_hex(),
            })?;
        Self::store(slots, &balance)?;
        Ok(balance.amount)
    }

    fn debit(
        &self,
        slots: &mut Slots<'_>,
        owner: &Identity,
        amount: u64,
    ) -> Result<u64, LedgerError> {
        let mut balance = Self::load(slots, owner)?;
        if balance.amount < amount {
            return Err(LedgerError::InsufficientStake {
                balance: balance.amount,
                required: amount,
            });
        }
        balance.amount -= amount;
        Self::store(slots, &balance)?;
        Ok(balance.amount)
    }
}
