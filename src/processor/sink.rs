use std::future::Future;

use thiserror::Error;

use crate::models::ProcessedRecord;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("write failed: {0}")]
    Write(String),
    #[error("read failed: {0}")]
    Read(String),
}

/// Sole writer of the processed-word store.
///
/// Keys are the trimmed lowercase form of the word; storing the same
/// key twice is an idempotent overwrite (last write wins). The worker
/// never touches the storage API directly, it only goes through this
/// trait.
pub trait ResultSink: Send + Sync + 'static {
    fn store(
        &self,
        word: &str,
        record: &ProcessedRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
