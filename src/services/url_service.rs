//! Shortened URL service
//!
//! The four operations behind the HTTP API. Uniqueness and ownership are
//! expressed as store predicates; a failed predicate is a domain outcome,
//! everything else travels on the error path untouched.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::{Result, ShortkeepError};
use crate::storage::{Predicate, RecordStore, ShortenedUrl};

/// Result of a create-if-absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(ShortenedUrl),
    AlreadyExists,
}

/// Result of a redirect lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Target URL
    Found(String),
    NotFound,
}

/// Result of an owner-scoped delete
///
/// A missing id and a foreign owner collapse into the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFoundOrNotOwner,
}

/// Service for shortened URL operations
pub struct UrlService {
    store: Arc<dyn RecordStore>,
}

impl UrlService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Create `id → url` owned by `caller`, unless `id` is taken.
    pub async fn create_shortened_url(
        &self,
        id: &str,
        url: &str,
        caller: &str,
    ) -> Result<CreateOutcome> {
        let record = ShortenedUrl::new(id, url, caller);

        match self.store.put(record, Predicate::NotExists).await {
            Ok(stored) => {
                if stored.id != id || stored.owner != caller {
                    return Err(ShortkeepError::invariant_violation(format!(
                        "store wrote '{}' (owner '{}') for create of '{}'",
                        stored.id, stored.owner, id
                    )));
                }
                info!("Shortened URL created: {} -> {}", stored.id, stored.url);
                Ok(CreateOutcome::Created(stored))
            }
            Err(ShortkeepError::PredicateFailed(_)) => {
                debug!("Shortened URL already exists: {}", id);
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => {
                error!("Failed to create shortened URL {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Look up the redirect target for `id`. No authorization.
    pub async fn resolve_shortened_url(&self, id: &str) -> Result<ResolveOutcome> {
        match self.store.get(id).await {
            Ok(Some(record)) => {
                if record.id != id {
                    return Err(ShortkeepError::invariant_violation(format!(
                        "store returned '{}' for key '{}'",
                        record.id, id
                    )));
                }
                Ok(ResolveOutcome::Found(record.url))
            }
            Ok(None) => {
                debug!("Shortened URL not found: {}", id);
                Ok(ResolveOutcome::NotFound)
            }
            Err(e) => {
                error!("Failed to resolve shortened URL {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Delete `id` if `caller` owns it.
    pub async fn delete_shortened_url(&self, id: &str, caller: &str) -> Result<DeleteOutcome> {
        match self.store.delete(id, Predicate::owner_equals(caller)).await {
            Ok(()) => {
                info!("Shortened URL deleted: {}", id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(ShortkeepError::PredicateFailed(_)) => {
                // 不区分「不存在」与「非本人」
                debug!("Delete rejected for {}", id);
                Ok(DeleteOutcome::NotFoundOrNotOwner)
            }
            Err(e) => {
                error!("Failed to delete shortened URL {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Every record owned by `caller`, oldest first.
    pub async fn list_shortened_urls_by_owner(&self, caller: &str) -> Result<Vec<ShortenedUrl>> {
        let records = self.store.query_by_owner(caller).await.inspect_err(|e| {
            error!("Failed to list shortened URLs: {}", e);
        })?;

        if let Some(foreign) = records.iter().find(|r| r.owner != caller) {
            return Err(ShortkeepError::invariant_violation(format!(
                "owner index returned '{}' owned by '{}'",
                foreign.id, foreign.owner
            )));
        }

        debug!("Listed {} shortened URLs", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::storage::MemoryStore;

    fn service() -> UrlService {
        UrlService::new(Arc::new(MemoryStore::new()))
    }

    /// Store that hands back records for the wrong key/owner
    struct CorruptStore;

    #[async_trait]
    impl RecordStore for CorruptStore {
        async fn put(&self, record: ShortenedUrl, _: Predicate) -> Result<ShortenedUrl> {
            Ok(ShortenedUrl::new("other", record.url, record.owner))
        }

        async fn get(&self, _: &str) -> Result<Option<ShortenedUrl>> {
            Ok(Some(ShortenedUrl::new("other", "https://x.com", "k1")))
        }

        async fn delete(&self, _: &str, _: Predicate) -> Result<()> {
            Ok(())
        }

        async fn query_by_owner(&self, _: &str) -> Result<Vec<ShortenedUrl>> {
            Ok(vec![ShortenedUrl::new("a", "https://x.com", "someone-else")])
        }

        fn backend_name(&self) -> &str {
            "corrupt"
        }
    }

    /// Store whose every call fails transiently
    struct DownStore;

    #[async_trait]
    impl RecordStore for DownStore {
        async fn put(&self, _: ShortenedUrl, _: Predicate) -> Result<ShortenedUrl> {
            Err(ShortkeepError::store_unavailable("connection refused"))
        }

        async fn get(&self, _: &str) -> Result<Option<ShortenedUrl>> {
            Err(ShortkeepError::store_unavailable("connection refused"))
        }

        async fn delete(&self, _: &str, _: Predicate) -> Result<()> {
            Err(ShortkeepError::store_unavailable("connection refused"))
        }

        async fn query_by_owner(&self, _: &str) -> Result<Vec<ShortenedUrl>> {
            Err(ShortkeepError::store_unavailable("connection refused"))
        }

        fn backend_name(&self) -> &str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_from_caller() {
        let service = service();
        let outcome = service
            .create_shortened_url("abc", "https://example.com", "k1")
            .await
            .unwrap();

        match outcome {
            CreateOutcome::Created(record) => {
                assert_eq!(record.id, "abc");
                assert_eq!(record.owner, "k1");
                assert!(record.timestamp.ends_with('Z'));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_conflict_is_already_exists() {
        let service = service();
        service
            .create_shortened_url("abc", "https://example.com", "k1")
            .await
            .unwrap();

        let outcome = service
            .create_shortened_url("abc", "https://other.com", "k2")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert_eq!(
            service.resolve_shortened_url("abc").await.unwrap(),
            ResolveOutcome::Found("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_hides_missing_vs_foreign() {
        let service = service();
        service
            .create_shortened_url("abc", "https://example.com", "k1")
            .await
            .unwrap();

        let foreign = service.delete_shortened_url("abc", "k2").await.unwrap();
        let missing = service.delete_shortened_url("nope", "k2").await.unwrap();
        assert_eq!(foreign, missing);
        assert_eq!(foreign, DeleteOutcome::NotFoundOrNotOwner);
    }

    #[tokio::test]
    async fn test_invariant_violations_surface_as_errors() {
        let service = UrlService::new(Arc::new(CorruptStore));

        let err = service.resolve_shortened_url("abc").await.unwrap_err();
        assert!(matches!(err, ShortkeepError::InvariantViolation(_)));

        let err = service
            .create_shortened_url("abc", "https://x.com", "k1")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortkeepError::InvariantViolation(_)));

        let err = service.list_shortened_urls_by_owner("k1").await.unwrap_err();
        assert!(matches!(err, ShortkeepError::InvariantViolation(_)));
    }

    #[tokio::test]
    async fn test_store_failures_are_not_swallowed() {
        let service = UrlService::new(Arc::new(DownStore));

        assert!(
            service
                .create_shortened_url("abc", "https://x.com", "k1")
                .await
                .unwrap_err()
                .is_transient()
        );
        assert!(service.resolve_shortened_url("abc").await.unwrap_err().is_transient());
        assert!(service.delete_shortened_url("abc", "k1").await.unwrap_err().is_transient());
        assert!(service.list_shortened_urls_by_owner("k1").await.unwrap_err().is_transient());
    }
}
