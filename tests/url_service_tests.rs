//! UrlService tests
//!
//! Domain outcomes over real stores, including the end-to-end ownership
//! scenario on SQLite.

use std::sync::{Arc, Once};

use futures_util::future::join_all;
use shortkeep::config::init_config;
use shortkeep::services::{CreateOutcome, DeleteOutcome, ResolveOutcome, UrlService};
use shortkeep::storage::{MemoryStore, SeaOrmStorage};
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

fn memory_service() -> UrlService {
    UrlService::new(Arc::new(MemoryStore::new()))
}

async fn sqlite_service() -> (UrlService, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("service.db").display()
    );
    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (UrlService::new(Arc::new(storage)), temp_dir)
}

async fn run_ownership_scenario(service: &UrlService) {
    // k1 创建 abc
    let created = match service
        .create_shortened_url("abc", "https://example.com", "k1")
        .await
        .unwrap()
    {
        CreateOutcome::Created(record) => record,
        other => panic!("expected Created, got {:?}", other),
    };
    assert_eq!(created.owner, "k1");
    assert_eq!(created.url, "https://example.com");

    assert_eq!(
        service.resolve_shortened_url("abc").await.unwrap(),
        ResolveOutcome::Found("https://example.com".to_string())
    );

    // k2 抢注失败，记录不变
    assert_eq!(
        service
            .create_shortened_url("abc", "https://other.com", "k2")
            .await
            .unwrap(),
        CreateOutcome::AlreadyExists
    );
    assert_eq!(
        service.resolve_shortened_url("abc").await.unwrap(),
        ResolveOutcome::Found("https://example.com".to_string())
    );

    // k2 删除失败，k1 删除成功
    assert_eq!(
        service.delete_shortened_url("abc", "k2").await.unwrap(),
        DeleteOutcome::NotFoundOrNotOwner
    );
    assert_eq!(
        service.delete_shortened_url("abc", "k1").await.unwrap(),
        DeleteOutcome::Deleted
    );

    assert_eq!(
        service.resolve_shortened_url("abc").await.unwrap(),
        ResolveOutcome::NotFound
    );
}

#[tokio::test]
async fn test_ownership_scenario_memory() {
    run_ownership_scenario(&memory_service()).await;
}

#[tokio::test]
async fn test_ownership_scenario_sqlite() {
    let (service, _dir) = sqlite_service().await;
    run_ownership_scenario(&service).await;
}

#[tokio::test]
async fn test_delete_is_indistinguishable_for_missing_and_foreign() {
    let service = memory_service();
    service
        .create_shortened_url("mine", "https://example.com", "k1")
        .await
        .unwrap();

    let foreign = service.delete_shortened_url("mine", "k2").await.unwrap();
    let missing = service.delete_shortened_url("never", "k2").await.unwrap();
    assert_eq!(foreign, missing);

    // 删除已删除的记录与从未存在的记录相同
    service.delete_shortened_url("mine", "k1").await.unwrap();
    assert_eq!(
        service.delete_shortened_url("mine", "k1").await.unwrap(),
        DeleteOutcome::NotFoundOrNotOwner
    );
}

#[tokio::test]
async fn test_list_returns_only_callers_records() {
    let (service, _dir) = sqlite_service().await;

    for (id, owner) in [("a1", "alice"), ("b1", "bob"), ("a2", "alice")] {
        service
            .create_shortened_url(id, "https://example.com", owner)
            .await
            .unwrap();
    }

    let alice = service.list_shortened_urls_by_owner("alice").await.unwrap();
    let mut ids: Vec<&str> = alice.iter().map(|r| r.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a1", "a2"]);
    assert!(alice.iter().all(|r| r.owner == "alice"));

    assert!(
        service
            .list_shortened_urls_by_owner("carol")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_resolve_is_stable() {
    let service = memory_service();
    service
        .create_shortened_url("stable", "https://example.com/a?b=c", "k1")
        .await
        .unwrap();

    let first = service.resolve_shortened_url("stable").await.unwrap();
    let second = service.resolve_shortened_url("stable").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        ResolveOutcome::Found("https://example.com/a?b=c".to_string())
    );
}

#[tokio::test]
async fn test_concurrent_identical_creates() {
    let (service, _dir) = sqlite_service().await;
    let service = Arc::new(service);

    let attempts = (0..10).map(|_| {
        let service = service.clone();
        async move {
            service
                .create_shortened_url("same", "https://example.com", "k1")
                .await
                .unwrap()
        }
    });
    let outcomes = join_all(attempts).await;

    let created = outcomes
        .iter()
        .filter(|o| matches!(o, CreateOutcome::Created(_)))
        .count();
    let exists = outcomes
        .iter()
        .filter(|o| matches!(o, CreateOutcome::AlreadyExists))
        .count();
    assert_eq!(created, 1);
    assert_eq!(exists, 9);
    assert_eq!(service.store().backend_name(), "sqlite");
}
