use crate::error::TransportError;
use async_trait::async_trait;
use filetrack_location::{FileRecord, NewRecord, RecordId, RecordUpdate};

pub type StoreResult<T> = std::result::Result<T, TransportError>;

/// Request/response contract of the remote record store.
///
/// Any transport satisfying these four calls can back a [`crate::Registry`]:
/// REST ([`crate::HttpStore`]), an in-process map ([`crate::MemoryStore`]),
/// or anything else.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_all(&self) -> StoreResult<Vec<FileRecord>>;

    /// Persist a new record; the store assigns its id.
    ///
    /// Any success is an acknowledgement. The stored record comes back only
    /// when the store echoes it, so callers reload to learn the id.
    async fn create(&self, record: &NewRecord) -> StoreResult<Option<FileRecord>>;

    async fn update(&self, id: &RecordId, update: &RecordUpdate) -> StoreResult<()>;

    async fn delete(&self, id: &RecordId) -> StoreResult<()>;
}
