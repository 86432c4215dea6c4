use crate::codec::{self, LocationToken};
use crate::error::{Field, ValidationError};
use crate::{Cluster, MAX_COORDINATE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote store. Never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A tracked physical document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: RecordId,
    pub file_id: String,
    pub cluster: Cluster,
    pub row: u8,
    pub column: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl FileRecord {
    /// Attach a server-assigned id to a validated record
    pub fn from_new(id: RecordId, record: NewRecord) -> Self {
        Self {
            id,
            file_id: record.file_id,
            cluster: record.cluster,
            row: record.row,
            column: record.column,
            address: record.address,
        }
    }

    pub fn location(&self) -> LocationToken {
        codec::encode(self.cluster, self.row, self.column)
    }

    /// Merge the fields present in `update`, leaving the rest untouched
    pub fn apply(&mut self, update: &RecordUpdate) {
        if let Some(file_id) = &update.file_id {
            self.file_id = file_id.clone();
        }
        if let Some(cluster) = update.cluster {
            self.cluster = cluster;
        }
        if let Some(row) = update.row {
            self.row = row;
        }
        if let Some(column) = update.column {
            self.column = column;
        }
        if let Some(address) = &update.address {
            self.address = address.clone();
        }
    }
}

/// Validated record ready to be sent to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub file_id: String,
    pub cluster: Cluster,
    pub row: u8,
    pub column: u8,
    pub address: Option<String>,
}

/// Raw user input for a new record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    pub file_id: String,
    pub cluster: String,
    pub row: i64,
    pub column: i64,
    #[serde(default)]
    pub address: Option<String>,
}

impl RecordDraft {
    pub fn new(file_id: impl Into<String>, cluster: impl Into<String>, row: i64, column: i64) -> Self {
        Self {
            file_id: file_id.into(),
            cluster: cluster.into(),
            row,
            column,
            address: None,
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check the draft against the record invariants. Fields are checked in
    /// declaration order and the first failure is reported.
    pub fn validate(&self) -> Result<NewRecord, ValidationError> {
        Ok(NewRecord {
            file_id: validate_file_id(&self.file_id)?,
            cluster: validate_cluster(&self.cluster)?,
            row: validate_coordinate(Field::Row, self.row)?,
            column: validate_coordinate(Field::Column, self.column)?,
            address: normalize_address(self.address.as_deref()),
        })
    }
}

/// Raw user input for a partial update. `None` leaves a field untouched;
/// an empty `address` clears the note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub file_id: Option<String>,
    pub cluster: Option<String>,
    pub row: Option<i64>,
    pub column: Option<i64>,
    pub address: Option<String>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn row(mut self, row: i64) -> Self {
        self.row = Some(row);
        self
    }

    pub fn column(mut self, column: i64) -> Self {
        self.column = Some(column);
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn validate(&self) -> Result<RecordUpdate, ValidationError> {
        Ok(RecordUpdate {
            file_id: self.file_id.as_deref().map(validate_file_id).transpose()?,
            cluster: self.cluster.as_deref().map(validate_cluster).transpose()?,
            row: self
                .row
                .map(|row| validate_coordinate(Field::Row, row))
                .transpose()?,
            column: self
                .column
                .map(|column| validate_coordinate(Field::Column, column))
                .transpose()?,
            address: self
                .address
                .as_deref()
                .map(|address| normalize_address(Some(address))),
        })
    }
}

/// Validated partial update. Only present fields are serialized, so the
/// store receives exactly what changed; a cleared address goes out as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Cluster>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.file_id.is_none()
            && self.cluster.is_none()
            && self.row.is_none()
            && self.column.is_none()
            && self.address.is_none()
    }
}

fn validate_file_id(file_id: &str) -> Result<String, ValidationError> {
    let trimmed = file_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::FileId, "file id is required"));
    }
    Ok(trimmed.to_string())
}

fn validate_cluster(cluster: &str) -> Result<Cluster, ValidationError> {
    cluster
        .parse()
        .map_err(|reason: String| ValidationError::new(Field::Cluster, reason))
}

fn validate_coordinate(field: Field, value: i64) -> Result<u8, ValidationError> {
    if (0..=i64::from(MAX_COORDINATE)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::out_of_range(field, value))
    }
}

fn normalize_address(address: Option<&str>) -> Option<String> {
    address
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}
