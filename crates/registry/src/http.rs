use crate::config::RegistryConfig;
use crate::error::TransportError;
use crate::store::{RemoteStore, StoreResult};
use async_trait::async_trait;
use filetrack_location::{FileRecord, NewRecord, RecordDraft, RecordId, RecordUpdate};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

/// REST backend speaking the `/api/file/*` JSON routes
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &RegistryConfig) -> StoreResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}/api/file/{route}", self.base_url)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn fetch_all(&self) -> StoreResult<Vec<FileRecord>> {
        let response = self.client.get(self.url("getallfile")).send().await?;
        // Elements are decoded one at a time; a bad one is skipped
        let wire: Vec<Value> = ensure_success(response)?.json().await?;

        let total = wire.len();
        let records: Vec<FileRecord> = wire.into_iter().filter_map(WireRecord::parse).collect();
        if records.len() < total {
            log::warn!(
                "Skipped {} of {} records with invalid location data",
                total - records.len(),
                total
            );
        }
        Ok(records)
    }

    async fn create(&self, record: &NewRecord) -> StoreResult<Option<FileRecord>> {
        let response = self
            .client
            .post(self.url("createfile"))
            .json(record)
            .send()
            .await?;
        let body = ensure_success(response)?.bytes().await?;

        // Any 2xx acknowledges; only a full record body counts as an echo
        let echoed = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(WireRecord::parse);
        if echoed.is_none() {
            log::debug!("Create acknowledged without a usable record body");
        }
        Ok(echoed)
    }

    async fn update(&self, id: &RecordId, update: &RecordUpdate) -> StoreResult<()> {
        let response = self
            .client
            .put(self.url(&format!("updatefile/{id}")))
            .json(update)
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("deletefile/{id}")))
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }
}

fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status(status.as_u16()))
    }
}

/// Record as the backend serializes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    #[serde(rename = "_id")]
    id: String,
    file_id: String,
    cluster: String,
    row: i64,
    column: i64,
    #[serde(default)]
    address: Option<String>,
}

impl WireRecord {
    /// Decode one backend element, `None` when its shape or values are invalid
    fn parse(value: Value) -> Option<FileRecord> {
        match serde_json::from_value::<WireRecord>(value) {
            Ok(wire) => wire.into_record(),
            Err(err) => {
                log::debug!("Dropping undecodable record: {err}");
                None
            }
        }
    }

    /// Re-check the invariants; the backend is not trusted to enforce them
    fn into_record(self) -> Option<FileRecord> {
        let draft = RecordDraft {
            file_id: self.file_id,
            cluster: self.cluster,
            row: self.row,
            column: self.column,
            address: self.address,
        };
        match draft.validate() {
            Ok(valid) => Some(FileRecord::from_new(RecordId::new(self.id), valid)),
            Err(err) => {
                log::debug!("Dropping record {}: {err}", self.id);
                None
            }
        }
    }
}
