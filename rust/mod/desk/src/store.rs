//! RecordStore: whole-collection load/persist over a KV backend.
//!
//! Each collection lives under one fixed key as a JSON array. There is no
//! partial write and no merge: every mutation rewrites the entire array.

use std::sync::Arc;

use brokerdesk_kv::KVStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StorageError;

/// Fixed persisted keys, one per collection plus the active session.
pub mod keys {
    pub const USERS: &str = "desk:users";
    pub const SESSION: &str = "desk:session";
    pub const CLIENTS: &str = "desk:clients";
    pub const APPOINTMENTS: &str = "desk:appointments";
    pub const SALES: &str = "desk:sales";
    pub const QUOTES: &str = "desk:quotes";
    pub const LINKS: &str = "desk:links";
    pub const NOTIFICATIONS: &str = "desk:notifications";
}

/// Handle to the durable store. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct RecordStore {
    kv: Arc<dyn KVStore>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &Arc<dyn KVStore> {
        &self.kv
    }

    /// Read the JSON array stored under `key`.
    ///
    /// An absent key yields an empty list. So does a value that does not
    /// decode as an array of `T`: malformed data is treated as absence, and
    /// the next persist of this collection overwrites it.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        Ok(self.load_value::<Vec<T>>(key)?.unwrap_or_default())
    }

    /// Serialize `records` and overwrite the value under `key`.
    pub fn persist<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StorageError> {
        self.persist_value(key, records)?;
        debug!("persisted {} records to {}", records.len(), key);
        Ok(())
    }

    /// Read a single JSON value. Absent or malformed → `None`.
    pub fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let bytes = self
            .kv
            .get(key)
            .map_err(|source| StorageError::ReadFailed {
                key: key.to_string(),
                source,
            })?;

        let Some(bytes) = bytes else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("discarding malformed value under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Serialize one JSON value and overwrite the value under `key`.
    pub fn persist_value<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.kv
            .set(key, &bytes)
            .map_err(|source| StorageError::WriteFailed {
                key: key.to_string(),
                source,
            })
    }

    /// Remove the value under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.kv
            .delete(key)
            .map_err(|source| StorageError::WriteFailed {
                key: key.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerdesk_kv::{KVError, MemoryKV, RedbStore};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        n: u32,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "a".into(), n: 1 },
            Row { id: "b".into(), n: 2 },
        ]
    }

    #[test]
    fn absent_key_loads_empty() {
        let store = RecordStore::new(Arc::new(MemoryKV::new()));
        let loaded: Vec<Row> = store.load(keys::CLIENTS).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn persist_then_load_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(RedbStore::open(&dir.path().join("store.redb")).unwrap());
        let store = RecordStore::new(kv);

        store.persist(keys::LINKS, &rows()).unwrap();
        let loaded: Vec<Row> = store.load(keys::LINKS).unwrap();
        assert_eq!(loaded, rows());
    }

    #[test]
    fn persisted_value_is_a_plain_json_array() {
        let kv = Arc::new(MemoryKV::new());
        let store = RecordStore::new(kv.clone());
        store.persist(keys::SALES, &rows()).unwrap();

        let raw = kv.get(keys::SALES).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json, serde_json::json!([{"id": "a", "n": 1}, {"id": "b", "n": 2}]));
    }

    #[test]
    fn malformed_json_loads_empty() {
        let kv = Arc::new(MemoryKV::new());
        kv.set(keys::QUOTES, b"{not json").unwrap();
        let store = RecordStore::new(kv.clone());

        let loaded: Vec<Row> = store.load(keys::QUOTES).unwrap();
        assert!(loaded.is_empty());

        // Wrong shape is treated the same way.
        kv.set(keys::QUOTES, b"{\"id\":\"a\"}").unwrap();
        let loaded: Vec<Row> = store.load(keys::QUOTES).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn rejected_write_surfaces_as_write_failed() {
        let store = RecordStore::new(Arc::new(MemoryKV::with_quota(16)));
        let err = store.persist(keys::CLIENTS, &rows()).unwrap_err();
        match err {
            StorageError::WriteFailed { key, source } => {
                assert_eq!(key, keys::CLIENTS);
                assert!(matches!(source, KVError::QuotaExceeded { .. }));
            }
            other => panic!("expected WriteFailed, got {other:?}"),
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let store = RecordStore::new(Arc::new(MemoryKV::new()));
        store.persist_value(keys::SESSION, &serde_json::json!({"id": "7"})).unwrap();
        store.remove(keys::SESSION).unwrap();
        store.remove(keys::SESSION).unwrap();
        let v: Option<serde_json::Value> = store.load_value(keys::SESSION).unwrap();
        assert!(v.is_none());
    }
}
