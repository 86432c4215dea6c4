//! # Filetrack Registry
//!
//! Session-local mirror of the remote record store.
//!
//! ## Architecture
//!
//! ```text
//! caller
//!   │
//!   ├──> Registry (cache + status)
//!   │      ├─> validate drafts/patches locally
//!   │      ├─> RemoteStore call
//!   │      └─> mutate cache only after acknowledgement
//!   │
//!   └──> RemoteStore
//!          ├─> HttpStore   (REST backend)
//!          └─> MemoryStore (in-process)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use filetrack_registry::{HttpStore, Registry, RegistryConfig};
//! use filetrack_location::RecordDraft;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpStore::new(&RegistryConfig::from_env())?;
//!     let registry = Registry::new(Arc::new(store));
//!
//!     registry.load().await?;
//!     let record = registry.create(&RecordDraft::new("FILE-123", "C", 8, 9)).await?;
//!     println!("{} stored at {}", record.file_id, record.location());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod http;
mod memory;
mod registry;
mod store;

pub use config::{RegistryConfig, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
pub use error::{RegistryError, Result, TransportError};
pub use http::HttpStore;
pub use memory::{MemoryStore, Operation};
pub use registry::{BulkDeleteOutcome, Registry, RegistryStatus};
pub use store::{RemoteStore, StoreResult};

// Re-export record types for convenience
pub use filetrack_location::{FileRecord, NewRecord, RecordDraft, RecordId, RecordPatch, RecordUpdate};
