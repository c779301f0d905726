//! In-memory slot store with optimistic transactions
//!
//! Reads remember the version of every slot they observed. Commit takes the
//! write lock, checks that none of those versions moved, and applies the staged
//! writes. A transaction that lost a race is re-run from scratch, so the loser
//! of two racing creations sees the winner's record and fails deterministically.

use super::{SlotStore, SlotTransaction};
use crate::error::{LedgerError, StorageError};
use crate::types::Address;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::warn;

const DEFAULT_MAX_ATTEMPTS: usize = 64;

struct VersionedSlot {
    version: u64,
    value: Vec<u8>,
}

pub struct MemoryStore {
    slots: RwLock<HashMap<Address, VersionedSlot>>,
    max_attempts: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn version_of(slots: &HashMap<Address, VersionedSlot>, address: &Address) -> u64 {
        slots.get(address).map(|slot| slot.version).unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    reads: HashMap<Address, u64>,
    writes: HashMap<Address, Vec<u8>>,
}

impl<'a> MemoryTransaction<'a> {
    fn new(store: &'a MemoryStore) -> Self {
        Self {
            store,
            reads: HashMap::new(),
            writes: HashMap::new(),
        }
    }

    /// True when no slot this transaction read has changed since
    fn is_current(&self, slots: &HashMap<Address, VersionedSlot>) -> bool {
        self.reads
            .iter()
            .all(|(address, seen)| MemoryStore::version_of(slots, address) == *seen)
    }
}

impl SlotTransaction for MemoryTransaction<'_> {
    fn read(&mut self, address: &Address) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(staged) = self.writes.get(address) {
            return Ok(Some(staged.clone()));
        }
        let slots = self.store.slots.read();
        let version = MemoryStore::version_of(&slots, address);
        self.reads.entry(*address).or_insert(version);
        Ok(slots.get(address).map(|slot| slot.value.clone()))
    }

    fn write(&mut self, address: &Address, value: Vec<u8>) -> Result<(), StorageError> {
        self.writes.insert(*address, value);
        Ok(())
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, address: &Address) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slots.read().get(address).map(|slot| slot.value.clone()))
    }

    fn transact(
        &self,
        work: &mut dyn FnMut(&mut dyn SlotTransaction) -> Result<(), LedgerError>,
    ) -> Result<(), LedgerError> {
        for attempt in 1..=self.max_attempts {
            let mut tx = MemoryTransaction::new(self);
            if let Err(err) = work(&mut tx) {
                // A rejection computed from a stale view is re-run like a conflict.
                if tx.is_current(&self.slots.read()) {
                    return Err(err);
                }
                continue;
            }

            let mut slots = self.slots.write();
            if !tx.is_current(&slots) {
                drop(slots);
                warn!(attempt, "Slot transaction conflicted, retrying");
                continue;
            }
            for (address, value) in tx.writes {
                let version = Self::version_of(&slots, &address) + 1;
                slots.insert(address, VersionedSlot { version, value });
            }
            return Ok(());
        }
        Err(StorageError::Contention {
            attempts: self.max_attempts,
        }
        .into())
    }
}
