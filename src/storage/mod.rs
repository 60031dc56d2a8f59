//! Record store
//!
//! One key-value collection keyed by short id, with a secondary index on
//! owner. Every mutation is predicate-conditioned and atomic: the check and
//! the effect happen as a single step, so concurrent writers can't slip in
//! between them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStore;
pub use models::{Predicate, ShortenedUrl};

/// URL scheme selecting the in-process store
pub const MEMORY_URL_SCHEME: &str = "memory://";

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert `record` if no record exists for its id; `PredicateFailed` otherwise.
    ///
    /// Records are immutable once written, so `OwnerEquals` never holds here.
    async fn put(&self, record: ShortenedUrl, predicate: Predicate) -> Result<ShortenedUrl>;

    /// Absence is `Ok(None)`, never an error.
    async fn get(&self, id: &str) -> Result<Option<ShortenedUrl>>;

    /// Remove `id` if `predicate` holds. A missing id fails the predicate.
    async fn delete(&self, id: &str, predicate: Predicate) -> Result<()>;

    /// All records owned by `owner`, oldest first.
    async fn query_by_owner(&self, owner: &str) -> Result<Vec<ShortenedUrl>>;

    fn backend_name(&self) -> &str;

    /// Release connections on shutdown.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>> {
        let database_url = &config.database_url;

        if database_url.starts_with(MEMORY_URL_SCHEME) {
            info!("Using in-memory record store");
            return Ok(Arc::new(MemoryStore::new()));
        }

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;
        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
