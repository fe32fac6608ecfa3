use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("desk");

fn storage<E: Display>(e: E) -> KVError {
    KVError::Storage(e.to_string())
}

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database. Each `set` commits its own write transaction, so a
/// value is durable once the call returns.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage)?;

        // Make sure the table exists so that reads on a fresh file succeed.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        debug!("RedbStore: opened {:?}", path);
        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(storage(e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.remove(key).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn set_get_delete() {
        let (store, _dir) = open_temp();

        assert!(store.get("desk:clients").unwrap().is_none());

        store.set("desk:clients", b"[]").unwrap();
        assert_eq!(store.get("desk:clients").unwrap().as_deref(), Some(&b"[]"[..]));

        // Overwrite replaces the whole value.
        store.set("desk:clients", b"[1]").unwrap();
        assert_eq!(store.get("desk:clients").unwrap().as_deref(), Some(&b"[1]"[..]));

        store.delete("desk:clients").unwrap();
        assert!(store.get("desk:clients").unwrap().is_none());

        // Deleting again is fine.
        store.delete("desk:clients").unwrap();
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reopen.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("desk:links", b"[{\"id\":\"a\"}]").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("desk:links").unwrap().as_deref(),
            Some(&b"[{\"id\":\"a\"}]"[..])
        );
    }
}
