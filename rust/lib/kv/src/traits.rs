use crate::error::KVError;

/// KVStore provides the durable key-value interface the record store sits on.
///
/// Keys follow a namespaced convention: `desk:clients`, `desk:session`, etc.
/// Every value is an opaque byte string; callers own the encoding.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;
}
