use filetrack_location::{codec, FileRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a tracker query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Exact user-facing file id, ignoring case
    FileId,
    /// Three character slot token such as `C89`, ignoring case
    Location,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileId => f.write_str("file_id"),
            Self::Location => f.write_str("location"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "file_id" | "fileid" | "id" => Ok(Self::FileId),
            "location" | "loc" => Ok(Self::Location),
            other => Err(format!("unknown search mode '{other}'")),
        }
    }
}

/// Stateless lookups over the current record set.
///
/// When several records match, the first one in record-set order wins.
/// That is a fixed policy, not a relevance ranking.
pub struct SearchIndex;

impl SearchIndex {
    pub fn find_by_file_id<'a>(records: &'a [FileRecord], file_id: &str) -> Option<&'a FileRecord> {
        let needle = file_id.to_lowercase();
        records
            .iter()
            .find(|record| record.file_id.to_lowercase() == needle)
    }

    pub fn find_by_location<'a>(records: &'a [FileRecord], token: &str) -> Option<&'a FileRecord> {
        records.iter().find(|record| codec::matches(record, token))
    }

    /// Every record sharing the slot, in record-set order
    pub fn find_all_by_location<'a>(records: &'a [FileRecord], token: &str) -> Vec<&'a FileRecord> {
        records
            .iter()
            .filter(|record| codec::matches(record, token))
            .collect()
    }

    /// Trimmed query dispatched by `mode`. A blank query or a miss is `None`.
    pub fn search<'a>(
        records: &'a [FileRecord],
        query: &str,
        mode: SearchMode,
    ) -> Option<&'a FileRecord> {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("Ignoring blank {mode} query");
            return None;
        }

        let found = match mode {
            SearchMode::FileId => Self::find_by_file_id(records, query),
            SearchMode::Location => Self::find_by_location(records, query),
        };
        log::debug!(
            "Search {mode} '{query}': {}",
            found.map_or("no match", |_| "found")
        );
        found
    }
}
