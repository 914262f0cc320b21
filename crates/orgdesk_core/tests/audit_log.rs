use orgdesk_core::model::audit::AuditEntry;
use orgdesk_core::service::memory::InMemoryCollectionService;
use orgdesk_core::store::audit::AuditStore;
use orgdesk_core::{LoadOutcome, ServiceError, ZeroLimitPolicy};

fn entry(workspace_id: &str, action: &str, timestamp_ms: i64) -> AuditEntry {
    AuditEntry::new(workspace_id, "u-1", action, timestamp_ms)
}

#[test]
fn load_orders_by_time_and_keeps_the_newest_within_limit() {
    let service = InMemoryCollectionService::with_items(vec![
        entry("ws-1", "team.created", 300),
        entry("ws-1", "team.renamed", 100),
        entry("ws-2", "team.created", 50),
        entry("ws-1", "partner.invited", 200),
    ]);
    let mut store = AuditStore::new(2, ZeroLimitPolicy::Unbounded);

    let outcome = store.load(&service, Some("ws-1"));

    assert_eq!(outcome, Some(LoadOutcome::Applied(3)));
    let timestamps: Vec<i64> = store
        .entries()
        .iter()
        .map(|entry| entry.timestamp_ms)
        .collect();
    assert_eq!(timestamps, vec![200, 300]);
    assert_eq!(store.entries_by_action("team").len(), 1);
}

#[test]
fn load_without_workspace_is_skipped() {
    let service = InMemoryCollectionService::<AuditEntry>::new();
    let mut store = AuditStore::new(10, ZeroLimitPolicy::Unbounded);

    assert_eq!(store.load(&service, None), None);
    assert!(!store.state().status.loading);
}

#[test]
fn failed_reload_keeps_previous_entries() {
    let service = InMemoryCollectionService::with_items(vec![entry("ws-1", "team.created", 1)]);
    let mut store = AuditStore::new(10, ZeroLimitPolicy::Unbounded);
    store.load(&service, Some("ws-1"));

    service.fail_next(ServiceError::Unavailable("offline".to_string()));
    let outcome = store.load(&service, Some("ws-1"));

    assert!(matches!(outcome, Some(LoadOutcome::Failed(_))));
    assert_eq!(store.entry_count(), 1);
    assert!(store.state().status.error.is_some());
}

#[test]
fn zero_limit_retain_nothing_drops_loaded_entries() {
    let service = InMemoryCollectionService::with_items(vec![entry("ws-1", "team.created", 1)]);
    let mut store = AuditStore::new(0, ZeroLimitPolicy::RetainNothing);

    store.load(&service, Some("ws-1"));

    assert_eq!(store.entry_count(), 0);
}
