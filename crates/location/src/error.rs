use std::fmt;
use thiserror::Error;

/// Record field named by a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FileId,
    Cluster,
    Row,
    Column,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileId => "fileId",
            Self::Cluster => "cluster",
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft or patch rejected before it reaches the remote store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: Field, value: i64) -> Self {
        Self::new(
            field,
            format!("{value} is outside 0-{}", crate::MAX_COORDINATE),
        )
    }
}

/// Token that cannot be decoded into a cluster/row/column triple
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed location token '{token}': {reason}")]
pub struct MalformedToken {
    pub token: String,
    pub reason: &'static str,
}

impl MalformedToken {
    pub(crate) fn new(token: &str, reason: &'static str) -> Self {
        Self {
            token: token.to_string(),
            reason,
        }
    }
}
