use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryKV is an in-process KVStore.
///
/// An optional byte quota bounds the total size of all keys plus values, the
/// same way browser local storage caps an origin. A `set` that would cross the
/// quota fails with [`KVError::QuotaExceeded`] and leaves the old value intact.
pub struct MemoryKV {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    quota: Option<usize>,
}

impl Default for MemoryKV {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKV {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: None,
        }
    }

    /// Create an empty store that rejects writes past `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: Some(limit),
        }
    }
}

fn poisoned() -> KVError {
    KVError::Storage("memory store lock poisoned".to_string())
}

impl KVStore for MemoryKV {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let map = self.entries.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let mut map = self.entries.write().map_err(|_| poisoned())?;

        if let Some(limit) = self.quota {
            let others: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(KVError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        map.remove(key);
        Ok(())
    }
}
