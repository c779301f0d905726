//! Slot Store
//!
//! Storage substrate for ledger records. Records live at derived addresses and
//! every mutation happens inside a transaction that either commits all of its
//! writes or none of them. Conflicting transactions on the same slot are
//! serialized by the store: one commits, the other re-runs against the new state.

pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::SledSlotStore;

use crate::error::{LedgerError, StorageError};
use crate::types::Address;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Raw view of one open transaction
pub trait SlotTransaction {
    fn read(&mut self, address: &Address) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&mut self, address: &Address, value: Vec<u8>) -> Result<(), StorageError>;
}

/// Transactional slot store interface
///
/// `transact` may invoke `work` more than once when it loses a race; `work` must
/// only touch state through the transaction it is handed.
pub trait SlotStore: Send + Sync {
    fn get(&self, address: &Address) -> Result<Option<Vec<u8>>, StorageError>;

    fn transact(
        &self,
        work: &mut dyn FnMut(&mut dyn SlotTransaction) -> Result<(), LedgerError>,
    ) -> Result<(), LedgerError>;
}

/// Typed record access over an open transaction
pub struct Slots<'a> {
    tx: &'a mut dyn SlotTransaction,
}

impl<'a> Slots<'a> {
    pub fn new(tx: &'a mut dyn SlotTransaction) -> Self {
        Self { tx }
    }

    pub fn load<T: DeserializeOwned>(&mut self, address: &Address) -> Result<Option<T>, LedgerError> {
        match self.tx.read(address)? {
            Some(bytes) => Ok(Some(decode(address, &bytes)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&mut self, address: &Address) -> Result<bool, LedgerError> {
        Ok(self.tx.read(address)?.is_some())
    }

    pub fn save<T: Serialize>(&mut self, address: &Address, record: &T) -> Result<(), LedgerError> {
        let bytes = bincode::serialize(record).map_err(|source| StorageError::Codec {
            slot: hex::encode(address),
            source,
        })?;
        self.tx.write(address, bytes)?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(address: &Address, bytes: &[u8]) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|source| StorageError::Codec {
        slot: hex::encode(address),
        source,
    })
}

/// Run `op` as one atomic transaction and return its output
pub fn atomically<T>(
    store: &dyn SlotStore,
    mut op: impl FnMut(&mut Slots<'_>) -> Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    let mut output = None;
    store.transact(&mut |tx: &mut dyn SlotTransaction| {
        let mut slots = Slots::new(tx);
        output = Some(op(&mut slots)?);
        Ok(())
    })?;
    output.ok_or_else(|| StorageError::NoResult.into())
}

/// Read one committed record outside any transaction
pub fn fetch<T: DeserializeOwned>(
    store: &dyn SlotStore,
    address: &Address,
) -> Result<Option<T>, LedgerError> {
    match store.get(address)? {
        Some(bytes) => Ok(Some(decode(address, &bytes)?)),
        None => Ok(None),
    }
}
