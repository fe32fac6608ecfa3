//! Collection<T>: an in-memory snapshot of one persisted record array.
//!
//! Models impl `Record` to declare their persisted key; owner-stamped kinds
//! also impl `OwnedRecord` to declare how input becomes a record. Every
//! mutating call updates the snapshot first and then persists the whole
//! array. If the persist fails the snapshot keeps the change, so memory and
//! storage can diverge until the next successful write or `reload`.

use brokerdesk_core::new_id;
use serde::de::DeserializeOwned;
use serde::Serialize;

use tracing::warn;

use crate::error::StorageError;
use crate::store::RecordStore;

/// Trait implemented by every persisted record kind.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// KV key holding the whole collection.
    const KEY: &'static str;

    /// Identifier assigned at creation.
    fn id(&self) -> &str;

    /// Owning broker, for kinds stamped with one at creation.
    fn owner(&self) -> Option<&str> {
        None
    }
}

/// A record stamped with the broker who created it.
pub trait OwnedRecord: Record {
    /// Validated creation input.
    type Input;

    /// Build a record from input, a fresh id and the owner.
    /// Also stamps kind-specific defaults.
    fn assemble(id: String, owner_id: &str, input: Self::Input) -> Self;

    fn owner_id(&self) -> &str;
}

/// In-memory view of one collection plus the store it persists to.
pub struct Collection<T: Record> {
    store: RecordStore,
    records: Vec<T>,
}

impl<T: Record> Collection<T> {
    /// Load the persisted collection.
    pub fn open(store: RecordStore) -> Result<Self, StorageError> {
        let records = store.load(T::KEY)?;
        Ok(Self { store, records })
    }

    /// Records in persisted (insertion) order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Discard the snapshot and re-read from storage.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.records = self.store.load(T::KEY)?;
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.store.persist(T::KEY, &self.records)
    }

    /// Append a record built around a freshly generated id.
    pub fn insert_with(&mut self, build: impl FnOnce(String) -> T) -> Result<T, StorageError> {
        let record = build(new_id());
        self.records.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Remove the record with `id`. Returns whether one was removed; an
    /// unknown id is a no-op and does not touch storage.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        if self.records.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Replace the record with the same id as `record`, keeping its position.
    /// Returns false (and writes nothing) if no such record exists or if
    /// `record` names a different owner than the stored one.
    pub fn replace(&mut self, record: T) -> Result<bool, StorageError> {
        let Some(slot) = self.records.iter_mut().find(|r| r.id() == record.id()) else {
            return Ok(false);
        };
        if slot.owner() != record.owner() {
            warn!("refusing to reassign owner of {} in {}", record.id(), T::KEY);
            return Ok(false);
        }
        *slot = record;
        self.persist()?;
        Ok(true)
    }

    /// Apply `change` to the record with `id` and persist.
    /// Returns false (and writes nothing) if no such record exists.
    pub(crate) fn modify(&mut self, id: &str, change: impl FnOnce(&mut T)) -> Result<bool, StorageError> {
        let Some(slot) = self.records.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        change(slot);
        self.persist()?;
        Ok(true)
    }
}

impl<T: OwnedRecord> Collection<T> {
    /// Create a record owned by `owner_id`.
    pub fn create(&mut self, input: T::Input, owner_id: &str) -> Result<T, StorageError> {
        self.insert_with(|id| T::assemble(id, owner_id, input))
    }
}
