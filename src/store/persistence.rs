//! Sled-backed slot store
//!
//! All ledger slots live in one sled tree so a ledger operation maps onto a
//! single serializable sled transaction.

use super::{SlotStore, SlotTransaction};
use crate::address::SYSTEM_PREFIX;
use crate::error::{LedgerError, StorageError};
use crate::types::Address;
use sled::transaction::{
    ConflictableTransactionError, TransactionError, TransactionalTree, UnabortableTransactionError,
};
use std::cell::RefCell;
use std::path::Path;

const SLOTS_TREE: &str = "slots";
const SCHEMA_VERSION: u32 = 1;

fn schema_key() -> Vec<u8> {
    let mut key = vec![SYSTEM_PREFIX];
    key.extend_from_slice(b"schema_version");
    key
}

pub struct SledSlotStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledSlotStore {
    /// Open (or create) a store at `path`
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(SLOTS_TREE)?;
        let key = schema_key();
        match tree.get(&key)? {
            Some(raw) => {
                let found = <[u8; 4]>::try_from(&raw[..])
                    .map(u32::from_le_bytes)
                    .unwrap_or(0);
                if found != SCHEMA_VERSION {
                    return Err(StorageError::SchemaMismatch {
                        found,
                        expected: SCHEMA_VERSION,
                    });
                }
            }
            None => {
                tree.insert(key, &SCHEMA_VERSION.to_le_bytes()[..])?;
            }
        }
        Ok(Self { db, tree })
    }

    /// Flush dirty pages to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

struct SledTransaction<'a> {
    tree: &'a TransactionalTree,
    /// Conflict raised by sled; handed back so sled re-runs the transaction
    conflict: Option<UnabortableTransactionError>,
}

impl SledTransaction<'_> {
    fn stash(&mut self, err: UnabortableTransactionError) -> StorageError {
        self.conflict = Some(err);
        StorageError::Conflict
    }
}

impl SlotTransaction for SledTransaction<'_> {
    fn read(&mut self, address: &Address) -> Result<Option<Vec<u8>>, StorageError> {
        match self.tree.get(&address[..]) {
            Ok(value) => Ok(value.map(|v| v.to_vec())),
            Err(e) => Err(self.stash(e)),
        }
    }

    fn write(&mut self, address: &Address, value: Vec<u8>) -> Result<(), StorageError> {
        match self.tree.insert(&address[..], value) {
            Ok(_) => Ok(()),
            Err(e) => Err(self.stash(e)),
        }
    }
}

impl SlotStore for SledSlotStore {
    fn get(&self, address: &Address) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.tree.get(&address[..])?.map(|v| v.to_vec()))
    }

    fn transact(
        &self,
        work: &mut dyn FnMut(&mut dyn SlotTransaction) -> Result<(), LedgerError>,
    ) -> Result<(), LedgerError> {
        let work = RefCell::new(work);
        let result = self.tree.transaction(|tree| {
            let mut tx = SledTransaction {
                tree,
                conflict: None,
            };
            let mut work = work.borrow_mut();
            let outcome = (*work)(&mut tx);
            if let Some(conflict) = tx.conflict.take() {
                return Err(conflict.into());
            }
            outcome.map_err(ConflictableTransactionError::Abort)
        });

        match result {
            Ok(()) => {
                self.tree.flush().map_err(StorageError::from)?;
                Ok(())
            }
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(StorageError::Sled(err).into()),
        }
    }
}
