use filetrack_location::{Cluster, Field, RecordDraft, RecordId, RecordPatch};
use filetrack_registry::{
    MemoryStore, Operation, Registry, RegistryError, TransportError,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn seeded_store() -> Arc<MemoryStore> {
    let drafts = [
        RecordDraft::new("F1", "C", 8, 9).address("Head office"),
        RecordDraft::new("F2", "K", 3, 4),
        RecordDraft::new("F3", "C", 8, 9),
    ];
    Arc::new(MemoryStore::seeded(
        drafts.iter().map(|d| d.validate().unwrap()).collect(),
    ))
}

async fn loaded_registry(store: &Arc<MemoryStore>) -> Registry {
    let registry = Registry::new(store.clone());
    registry.load().await.unwrap();
    registry
}

#[tokio::test]
async fn load_replaces_cache_and_marks_loaded() {
    let store = seeded_store();
    let registry = Registry::new(store.clone());
    assert!(registry.is_empty().await);

    let records = registry.load().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(registry.len().await, 3);

    let status = registry.status().await;
    assert!(status.loaded);
    assert!(!status.loading);
    assert_eq!(status.last_error, None);
}

#[tokio::test]
async fn failed_load_keeps_previous_cache() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    let before = registry.records().await;

    store.fail(Operation::FetchAll).await;
    let err = registry.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Transport(TransportError::Status(503))
    ));

    assert_eq!(registry.records().await, before);
    let status = registry.status().await;
    assert!(status.last_error.is_some());
    assert!(!status.refreshing);
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let store = seeded_store();
    let registry = Registry::new(store.clone());

    let err = registry
        .create(&RecordDraft::new("F9", "C", 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(ref e) if e.field == Field::Row));

    let err = registry
        .create(&RecordDraft::new("F9", "C", 0, -1))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(ref e) if e.field == Field::Column));

    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn create_reloads_to_get_server_id() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;

    let record = registry
        .create(&RecordDraft::new("F4", "g", 0, 2))
        .await
        .unwrap();
    assert_eq!(record.id.as_str(), "rec-4");
    assert_eq!(record.cluster, Cluster::Galle);

    assert_eq!(store.calls(Operation::FetchAll), 2);
    assert_eq!(registry.get(&record.id).await, Some(record));
}

#[tokio::test]
async fn create_failure_is_transport_error() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    store.fail(Operation::Create).await;

    let err = registry
        .create(&RecordDraft::new("F4", "G", 0, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Transport(_)));
    assert_eq!(registry.len().await, 3);
}

#[tokio::test]
async fn update_changes_only_patched_fields() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    let id = RecordId::new("rec-1");
    let before = registry.get(&id).await.unwrap();

    registry
        .update(&id, &RecordPatch::new().cluster("K"))
        .await
        .unwrap();

    let after = registry.get(&id).await.unwrap();
    let mut expected = before;
    expected.cluster = Cluster::Kandy;
    assert_eq!(after, expected);
    assert_eq!(store.calls(Operation::FetchAll), 1, "update must not reload");
}

#[tokio::test]
async fn update_of_uncached_record_is_not_found() {
    let store = seeded_store();
    // Never loaded: the store knows rec-1, the cache does not
    let registry = Registry::new(store.clone());

    let err = registry
        .update(&RecordId::new("rec-1"), &RecordPatch::new().row(2))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(ref id) if id.as_str() == "rec-1"));
}

#[tokio::test]
async fn invalid_patch_is_rejected_locally() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;

    let err = registry
        .update(&RecordId::new("rec-1"), &RecordPatch::new().column(10))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(ref e) if e.field == Field::Column));
    assert_eq!(store.calls(Operation::Update), 0);
}

#[tokio::test]
async fn failed_delete_keeps_record_for_retry() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    let id = RecordId::new("rec-2");

    store.fail_for_id(id.clone()).await;
    assert!(registry.delete(&id).await.is_err());
    assert!(registry.get(&id).await.is_some());

    store.recover().await;
    registry.delete(&id).await.unwrap();
    assert!(registry.get(&id).await.is_none());
}

#[tokio::test]
async fn bulk_delete_partitions_results() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    let ids = [
        RecordId::new("rec-1"),
        RecordId::new("rec-2"),
        RecordId::new("rec-3"),
    ];
    store.fail_for_id(ids[1].clone()).await;

    let outcome = registry.bulk_delete(&ids).await;
    assert_eq!(outcome.succeeded, vec![ids[0].clone(), ids[2].clone()]);
    assert_eq!(outcome.failed, vec![ids[1].clone()]);
    assert_eq!(outcome.summary(), "2 of 3 deleted");

    let remaining: Vec<RecordId> = registry
        .records()
        .await
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(remaining, vec![ids[1].clone()]);
    assert_eq!(
        registry.status().await.last_error.as_deref(),
        Some("2 of 3 deleted")
    );
}

#[tokio::test(start_paused = true)]
async fn bulk_delete_runs_calls_concurrently() {
    let drafts = (0..5)
        .map(|i| RecordDraft::new(format!("F{i}"), "T", i, i).validate().unwrap())
        .collect();
    let store = Arc::new(MemoryStore::seeded(drafts).with_latency(Duration::from_millis(100)));
    let registry = loaded_registry(&store).await;
    let ids: Vec<RecordId> = registry.records().await.into_iter().map(|r| r.id).collect();

    let started = tokio::time::Instant::now();
    let outcome = registry.bulk_delete(&ids).await;

    assert!(outcome.is_complete());
    assert!(registry.is_empty().await);
    assert!(started.elapsed() < Duration::from_millis(200));
}

#[tokio::test]
async fn deleted_id_is_not_reassigned() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    registry.delete(&RecordId::new("rec-3")).await.unwrap();

    let record = registry
        .create(&RecordDraft::new("F5", "A", 5, 6))
        .await
        .unwrap();
    assert_ne!(record.id.as_str(), "rec-3");
    assert!(registry.get(&RecordId::new("rec-3")).await.is_none());
}

#[tokio::test]
async fn create_survives_failed_reload() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    store.fail(Operation::FetchAll).await;

    let created = registry
        .create(&RecordDraft::new("F9", "t", 0, 0))
        .await
        .unwrap();
    assert_eq!(created.id, RecordId::new("rec-4"));
    assert_eq!(created.cluster, Cluster::Trincomalee);

    // Cache still holds the pre-create set; the reload error is surfaced
    assert_eq!(registry.len().await, 3);
    let status = registry.status().await;
    assert_eq!(status.last_error.as_deref(), Some("HTTP error! status: 503"));
    assert_eq!(store.snapshot().await.len(), 4);
}

#[tokio::test]
async fn refresh_clears_flag_and_error() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;

    store.fail(Operation::FetchAll).await;
    assert!(registry.refresh().await.is_err());
    let status = registry.status().await;
    assert!(!status.refreshing);
    assert!(status.last_error.is_some());

    store.recover().await;
    registry.refresh().await.unwrap();
    let status = registry.status().await;
    assert!(!status.refreshing);
    assert_eq!(status.last_error, None);
}

fn bare_ack_store() -> Arc<MemoryStore> {
    let drafts = [
        RecordDraft::new("F1", "C", 8, 9).address("Head office"),
        RecordDraft::new("F2", "K", 3, 4),
        RecordDraft::new("F3", "C", 8, 9),
    ];
    Arc::new(
        MemoryStore::seeded(drafts.iter().map(|d| d.validate().unwrap()).collect())
            .with_bare_acks(),
    )
}

#[tokio::test]
async fn create_without_echo_finds_new_record_on_reload() {
    let store = bare_ack_store();
    let registry = loaded_registry(&store).await;

    // Same fields as rec-3, so only the unseen id tells them apart
    let record = registry
        .create(&RecordDraft::new("F3", "c", 8, 9))
        .await
        .unwrap();
    assert_eq!(record.id, RecordId::new("rec-4"));
    assert_eq!(registry.len().await, 4);
    assert_eq!(registry.get(&record.id).await, Some(record));
}

#[tokio::test]
async fn create_without_echo_and_failed_reload_is_unconfirmed() {
    let store = bare_ack_store();
    let registry = loaded_registry(&store).await;
    store.fail(Operation::FetchAll).await;

    let err = registry
        .create(&RecordDraft::new("F9", "N", 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Unconfirmed { ref file_id, .. } if file_id == "F9"));
    assert_eq!(store.snapshot().await.len(), 4);
    assert_eq!(registry.len().await, 3);
}

#[tokio::test]
async fn failed_update_keeps_cached_record() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    let id = RecordId::new("rec-2");
    let before = registry.get(&id).await.unwrap();
    store.fail(Operation::Update).await;

    let err = registry
        .update(&id, &RecordPatch::new().row(7).address("Basement"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Transport(TransportError::Status(503))
    ));
    assert_eq!(registry.get(&id).await, Some(before));
    assert_eq!(
        registry.status().await.last_error.as_deref(),
        Some("HTTP error! status: 503")
    );
}

#[tokio::test]
async fn bulk_delete_sends_repeated_ids_once() {
    let store = seeded_store();
    let registry = loaded_registry(&store).await;
    let ids = [
        RecordId::new("rec-1"),
        RecordId::new("rec-2"),
        RecordId::new("rec-1"),
    ];

    let outcome = registry.bulk_delete(&ids).await;
    assert_eq!(outcome.succeeded, vec![ids[0].clone(), ids[1].clone()]);
    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.summary(), "2 of 2 deleted");
    assert_eq!(store.calls(Operation::Delete), 2);
}

#[tokio::test(start_paused = true)]
async fn overlapping_loads_keep_loading_flag_until_last_finishes() {
    let drafts = vec![RecordDraft::new("F1", "C", 1, 1).validate().unwrap()];
    let store = Arc::new(MemoryStore::seeded(drafts).with_latency(Duration::from_millis(100)));
    let registry = Arc::new(Registry::new(store.clone()));

    let first = tokio::spawn({
        let registry = Arc::clone(&registry);
        async move { registry.load().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = tokio::spawn({
        let registry = Arc::clone(&registry);
        async move { registry.refresh().await }
    });

    // First load is done at 100ms, the refresh runs until 150ms
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(first.is_finished());
    let status = registry.status().await;
    assert!(status.loading);
    assert!(status.refreshing);

    second.await.unwrap().unwrap();
    first.await.unwrap().unwrap();
    let status = registry.status().await;
    assert!(!status.loading);
    assert!(!status.refreshing);
    assert!(status.loaded);
}
