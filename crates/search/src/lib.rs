//! # Filetrack Search
//!
//! Tracker lookups (by file id or by slot token) and list filtering over a
//! record set. Nothing here holds state: pass in the registry's current
//! records and get references back.

mod filter;
mod index;

pub use filter::RecordFilter;
pub use index::{SearchIndex, SearchMode};
