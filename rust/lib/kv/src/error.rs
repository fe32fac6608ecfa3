use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    /// The write would push the store past its byte quota.
    #[error("quota exceeded writing {key}: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("storage error: {0}")]
    Storage(String),
}
