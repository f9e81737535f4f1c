//! In-process store for tests and ephemeral deployments.

use super::{EmiRecordStore, StoreResult};
use crate::error::StoreError;
use crate::record::{EmiRecord, NewEmiRecord, RecordId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

/// Records held in a `BTreeMap` so iteration is in id order.
///
/// Ids come from an atomic counter starting at 1, so concurrent inserts
/// never collide even though they take the write lock separately.
pub struct MemoryStore {
    next_id: AtomicI64,
    records: RwLock<BTreeMap<RecordId, EmiRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore {
            next_id: AtomicI64::new(1),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> StoreResult<usize> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EmiRecordStore for MemoryStore {
    fn insert(&self, record: NewEmiRecord) -> StoreResult<EmiRecord> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = record.with_id(id);

        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(id, stored.clone());
        Ok(stored)
    }

    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<EmiRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn get_by_email(&self, email: &str) -> StoreResult<Vec<EmiRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .values()
            .filter(|r| r.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }
}
