use crate::error::TransportError;
use crate::store::{RemoteStore, StoreResult};
use async_trait::async_trait;
use filetrack_location::{FileRecord, NewRecord, RecordId, RecordUpdate};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Remote operation kinds, used for call accounting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchAll,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn index(self) -> usize {
        match self {
            Self::FetchAll => 0,
            Self::Create => 1,
            Self::Update => 2,
            Self::Delete => 3,
        }
    }
}

/// In-process store with server-like id assignment.
///
/// Ids are `rec-<n>` with `n` strictly increasing, so a deleted id never
/// comes back. Failures can be injected per operation or per record id.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    calls: [AtomicUsize; 4],
    latency: Option<Duration>,
    echo_creates: bool,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<FileRecord>,
    next_id: u64,
    failing_ops: HashSet<Operation>,
    failing_ids: HashSet<RecordId>,
}

impl MemoryState {
    fn insert(&mut self, record: NewRecord) -> FileRecord {
        self.next_id += 1;
        let stored = FileRecord::from_new(RecordId::new(format!("rec-{}", self.next_id)), record);
        self.records.push(stored.clone());
        stored
    }

    fn check(&self, op: Operation, id: Option<&RecordId>) -> StoreResult<()> {
        if self.failing_ops.contains(&op) {
            return Err(TransportError::Status(503));
        }
        if id.is_some_and(|id| self.failing_ids.contains(id)) {
            return Err(TransportError::Status(500));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Start with `records` already stored, ids assigned in order
    pub fn seeded(records: Vec<NewRecord>) -> Self {
        let mut state = MemoryState::default();
        for record in records {
            state.insert(record);
        }
        Self {
            state: Mutex::new(state),
            calls: Default::default(),
            latency: None,
            echo_creates: true,
        }
    }

    /// Delay every call, to make overlapping requests observable
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Acknowledge creates without returning the stored record
    pub fn with_bare_acks(mut self) -> Self {
        self.echo_creates = false;
        self
    }

    /// Number of calls received for `op`, failed ones included
    pub fn calls(&self, op: Operation) -> usize {
        self.calls[op.index()].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Make every `op` call fail until [`MemoryStore::recover`]
    pub async fn fail(&self, op: Operation) {
        self.state.lock().await.failing_ops.insert(op);
    }

    /// Make update/delete calls for `id` fail until [`MemoryStore::recover`]
    pub async fn fail_for_id(&self, id: RecordId) {
        self.state.lock().await.failing_ids.insert(id);
    }

    pub async fn recover(&self) {
        let mut state = self.state.lock().await;
        state.failing_ops.clear();
        state.failing_ids.clear();
    }

    /// Current server-side contents, bypassing call accounting
    pub async fn snapshot(&self) -> Vec<FileRecord> {
        self.state.lock().await.records.clone()
    }

    async fn enter(&self, op: Operation) {
        self.calls[op.index()].fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_all(&self) -> StoreResult<Vec<FileRecord>> {
        self.enter(Operation::FetchAll).await;
        let state = self.state.lock().await;
        state.check(Operation::FetchAll, None)?;
        Ok(state.records.clone())
    }

    async fn create(&self, record: &NewRecord) -> StoreResult<Option<FileRecord>> {
        self.enter(Operation::Create).await;
        let mut state = self.state.lock().await;
        state.check(Operation::Create, None)?;
        let stored = state.insert(record.clone());
        Ok(self.echo_creates.then_some(stored))
    }

    async fn update(&self, id: &RecordId, update: &RecordUpdate) -> StoreResult<()> {
        self.enter(Operation::Update).await;
        let mut state = self.state.lock().await;
        state.check(Operation::Update, Some(id))?;
        let record = state
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or(TransportError::Status(404))?;
        record.apply(update);
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        self.enter(Operation::Delete).await;
        let mut state = self.state.lock().await;
        state.check(Operation::Delete, Some(id))?;
        let before = state.records.len();
        state.records.retain(|r| &r.id != id);
        if state.records.len() == before {
            return Err(TransportError::Status(404));
        }
        Ok(())
    }
}
