use filetrack_location::{RecordId, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    /// Rejected locally; nothing was sent to the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Store acknowledged a mutation for an id the local cache does not hold
    #[error("Not found: {0}")]
    NotFound(RecordId),

    /// Store acknowledged a create but the new record could not be identified.
    /// The record may exist remotely; reload before creating it again.
    #[error("Created {file_id} but could not confirm it: {reason}")]
    Unconfirmed { file_id: String, reason: String },
}

/// Remote call failed or came back unsuccessful
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(err.to_string())
        }
    }
}
