use crate::error::{RegistryError, Result, TransportError};
use crate::store::RemoteStore;
use filetrack_location::{FileRecord, NewRecord, RecordDraft, RecordId, RecordPatch};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Loading/error state exposed to list and dashboard views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    /// At least one full load is in flight
    pub loading: bool,

    /// At least one in-flight load was requested through [`Registry::refresh`]
    pub refreshing: bool,

    /// At least one load has succeeded
    pub loaded: bool,

    /// Most recent remote failure, cleared by the next successful load
    pub last_error: Option<String>,
}

/// Partition of a bulk delete. Both lists keep the order ids were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteOutcome {
    pub succeeded: Vec<RecordId>,
    pub failed: Vec<RecordId>,
}

impl BulkDeleteOutcome {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    /// e.g. "7 of 10 deleted"
    pub fn summary(&self) -> String {
        format!("{} of {} deleted", self.succeeded.len(), self.total())
    }
}

/// Authoritative record set for one session.
///
/// The cache only changes after the store acknowledges a mutation (update,
/// delete) or after a full reload (load, create). Locks are never held across
/// a remote call, so callers may overlap operations; overlapping mutations of
/// the same id resolve as last-acknowledgement-wins.
pub struct Registry {
    store: Arc<dyn RemoteStore>,
    records: RwLock<Vec<FileRecord>>,
    status: RwLock<RegistryStatus>,
    loads_in_flight: AtomicUsize,
    refreshes_in_flight: AtomicUsize,
}

impl Registry {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            records: RwLock::new(Vec::new()),
            status: RwLock::new(RegistryStatus::default()),
            loads_in_flight: AtomicUsize::new(0),
            refreshes_in_flight: AtomicUsize::new(0),
        }
    }

    /// Replace the cache with the store's full record set.
    /// On failure the previous cache is kept as is.
    pub async fn load(&self) -> Result<Vec<FileRecord>> {
        {
            let mut status = self.status.write().await;
            self.loads_in_flight.fetch_add(1, Ordering::SeqCst);
            status.loading = true;
        }
        let fetched = self.store.fetch_all().await;

        let mut status = self.status.write().await;
        status.loading = self.loads_in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        match fetched {
            Ok(records) => {
                log::info!("Loaded {} records", records.len());
                *self.records.write().await = records.clone();
                status.loaded = true;
                status.last_error = None;
                Ok(records)
            }
            Err(err) => {
                log::warn!("Failed to load records: {err}");
                status.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    pub async fn refresh(&self) -> Result<Vec<FileRecord>> {
        {
            let mut status = self.status.write().await;
            self.refreshes_in_flight.fetch_add(1, Ordering::SeqCst);
            status.refreshing = true;
        }
        let result = self.load().await;

        let mut status = self.status.write().await;
        status.refreshing = self.refreshes_in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        result
    }

    /// Validate and create a record, then reload to pick up the id the
    /// store assigned.
    ///
    /// When the store does not echo the created record, the new record is
    /// the newest reloaded one with the submitted fields and an id the cache
    /// did not hold before. If only the reload fails, an echoed record is
    /// returned and the cache stays as it was; without an echo the create is
    /// reported as [`RegistryError::Unconfirmed`] and must not be retried
    /// blindly.
    pub async fn create(&self, draft: &RecordDraft) -> Result<FileRecord> {
        let record = draft.validate()?;
        let known: HashSet<RecordId> = self
            .records
            .read()
            .await
            .iter()
            .map(|r| r.id.clone())
            .collect();

        let echoed = match self.store.create(&record).await {
            Ok(echoed) => echoed,
            Err(err) => return Err(self.remote_failure("create", err).await),
        };
        match &echoed {
            Some(created) => log::info!("Created record {} at {}", created.id, created.location()),
            None => log::info!("Store acknowledged new record {}", record.file_id),
        }

        let reloaded = match self.load().await {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Record {} created but reload failed: {err}", record.file_id);
                return echoed.ok_or_else(|| RegistryError::Unconfirmed {
                    file_id: record.file_id.clone(),
                    reason: err.to_string(),
                });
            }
        };

        let found = match &echoed {
            Some(created) => reloaded.iter().find(|r| r.id == created.id),
            None => reloaded
                .iter()
                .rev()
                .find(|r| !known.contains(&r.id) && holds(r, &record)),
        };
        match (found, echoed) {
            (Some(found), _) => Ok(found.clone()),
            (None, Some(created)) => Ok(created),
            (None, None) => {
                let reason = "not present after reload".to_string();
                log::warn!("Record {} acknowledged but {reason}", record.file_id);
                self.status.write().await.last_error =
                    Some(format!("Created {} but it is {reason}", record.file_id));
                Err(RegistryError::Unconfirmed {
                    file_id: record.file_id,
                    reason,
                })
            }
        }
    }

    /// Send a partial update and merge it into the cached record on success
    pub async fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        let update = patch.validate()?;
        if let Err(err) = self.store.update(id, &update).await {
            return Err(self.remote_failure("update", err).await);
        }

        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| &r.id == id) else {
            log::warn!("Store acknowledged update of {id} but it is not cached");
            return Err(RegistryError::NotFound(id.clone()));
        };
        record.apply(&update);
        log::debug!("Updated record {id}");
        Ok(())
    }

    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        if let Err(err) = self.store.delete(id).await {
            return Err(self.remote_failure("delete", err).await);
        }
        self.records.write().await.retain(|r| &r.id != id);
        log::debug!("Deleted record {id}");
        Ok(())
    }

    /// Delete every id concurrently and report which calls succeeded.
    /// Never fails as a whole; failed ids stay cached so they can be retried.
    /// Repeated ids are sent once, at their first position.
    pub async fn bulk_delete(&self, ids: &[RecordId]) -> BulkDeleteOutcome {
        let mut seen = HashSet::new();
        let tasks: Vec<_> = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .map(|id| {
                let store = Arc::clone(&self.store);
                let task_id = id.clone();
                let task = tokio::spawn(async move { store.delete(&task_id).await });
                (id.clone(), task)
            })
            .collect();

        let mut outcome = BulkDeleteOutcome::default();
        for (id, task) in tasks {
            match task.await {
                Ok(Ok(())) => outcome.succeeded.push(id),
                Ok(Err(err)) => {
                    log::warn!("Failed to delete {id}: {err}");
                    outcome.failed.push(id);
                }
                Err(err) => {
                    log::warn!("Delete task for {id} panicked: {err}");
                    outcome.failed.push(id);
                }
            }
        }

        if !outcome.succeeded.is_empty() {
            let deleted: HashSet<&RecordId> = outcome.succeeded.iter().collect();
            self.records
                .write()
                .await
                .retain(|r| !deleted.contains(&r.id));
        }
        if !outcome.is_complete() {
            self.status.write().await.last_error = Some(outcome.summary());
        }

        log::info!("Bulk delete: {}", outcome.summary());
        outcome
    }

    /// Snapshot of the cached records in store order
    pub async fn records(&self) -> Vec<FileRecord> {
        self.records.read().await.clone()
    }

    /// Run `f` against the cache without cloning it
    pub async fn with_records<R>(&self, f: impl FnOnce(&[FileRecord]) -> R) -> R {
        let records = self.records.read().await;
        f(&records)
    }

    pub async fn get(&self, id: &RecordId) -> Option<FileRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| &r.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn status(&self) -> RegistryStatus {
        self.status.read().await.clone()
    }

    async fn remote_failure(&self, action: &str, err: TransportError) -> RegistryError {
        log::warn!("Failed to {action} record: {err}");
        self.status.write().await.last_error = Some(err.to_string());
        err.into()
    }
}

/// Whether `stored` carries exactly the submitted fields
fn holds(stored: &FileRecord, submitted: &NewRecord) -> bool {
    stored.file_id == submitted.file_id
        && stored.cluster == submitted.cluster
        && stored.row == submitted.row
        && stored.column == submitted.column
        && stored.address == submitted.address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_summary() {
        let outcome = BulkDeleteOutcome {
            succeeded: vec![RecordId::new("a"), RecordId::new("c")],
            failed: vec![RecordId::new("b")],
        };
        assert_eq!(outcome.summary(), "2 of 3 deleted");
        assert!(!outcome.is_complete());
        assert!(!outcome.is_total_failure());
    }

    #[test]
    fn test_empty_outcome_is_complete() {
        let outcome = BulkDeleteOutcome::default();
        assert!(outcome.is_complete());
        assert!(!outcome.is_total_failure());
        assert_eq!(outcome.summary(), "0 of 0 deleted");
    }
}
