//! # Filetrack Location
//!
//! Physical addressing for documents stored in a grid of named clusters.
//!
//! Every record lives at a slot identified by a cluster letter, a row digit and
//! a column digit. The slot is addressed by a three character token:
//!
//! ```text
//! cluster  row  column
//!    C      8     9      ──>  "C89"
//! ```
//!
//! Several records may share one slot; nothing here enforces exclusivity.
//!
//! ## Example
//!
//! ```rust
//! use filetrack_location::{codec, Cluster, RecordDraft};
//!
//! let draft = RecordDraft::new("FILE-123", "c", 8, 9);
//! let record = draft.validate().unwrap();
//! assert_eq!(record.cluster, Cluster::Colombo);
//!
//! let token = codec::encode(record.cluster, record.row, record.column);
//! assert_eq!(token.as_str(), "C89");
//!
//! let decoded = codec::decode("c89").unwrap();
//! assert_eq!((decoded.cluster, decoded.row, decoded.column), (Cluster::Colombo, 8, 9));
//! ```

mod cluster;
pub mod codec;
mod error;
mod types;

pub use cluster::Cluster;
pub use codec::{DecodedToken, LocationToken};
pub use error::{Field, MalformedToken, ValidationError};
pub use types::{FileRecord, NewRecord, RecordDraft, RecordId, RecordPatch, RecordUpdate};

/// Highest valid row or column coordinate.
pub const MAX_COORDINATE: u8 = 9;
