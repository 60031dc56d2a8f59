//! SeaORM storage backend
//!
//! Record store over SQLite, MySQL/MariaDB or PostgreSQL. Each predicate is
//! translated into a single conditional statement, so the database enforces
//! check-and-mutate atomicity.

pub mod classify;
mod connection;
mod converters;
mod mutations;
mod query;

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use super::models::{Predicate, ShortenedUrl};
use super::RecordStore;
use crate::errors::{Result, ShortkeepError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, record_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortkeepError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// `database.timeout` 秒数，最少 1 秒
///
/// 同时用作单次操作超时和 SQLite busy_timeout，锁等待不会超过操作本身。
pub(crate) fn operation_timeout(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

/// SeaORM-based record store
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 单次操作超时
    op_timeout: Duration,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ShortkeepError::database_config("database_url 未设置"));
        }

        let config = crate::config::get_config();
        let op_timeout = operation_timeout(config.database.timeout);

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, op_timeout).await?
        } else {
            connect_generic(database_url, backend_name, config.database.pool_size).await?
        };

        run_migrations(&db).await?;

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            op_timeout,
        };

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }
}

#[async_trait]
impl RecordStore for SeaOrmStorage {
    async fn put(&self, record: ShortenedUrl, predicate: Predicate) -> Result<ShortenedUrl> {
        match predicate {
            Predicate::NotExists => self.insert_if_absent(record).await,
            // 记录创建后不可修改
            Predicate::OwnerEquals(_) => Err(ShortkeepError::predicate_failed(format!(
                "put({}) rejected by {:?}",
                record.id, predicate
            ))),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<ShortenedUrl>> {
        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str, predicate: Predicate) -> Result<()> {
        match predicate {
            Predicate::OwnerEquals(owner) => self.delete_if_owner(id, &owner).await,
            // 删除要求记录存在，NotExists 永远不成立
            Predicate::NotExists => Err(ShortkeepError::predicate_failed(format!(
                "delete({}) rejected by NotExists",
                id
            ))),
        }
    }

    async fn query_by_owner(&self, owner: &str) -> Result<Vec<ShortenedUrl>> {
        self.find_by_owner(owner).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| ShortkeepError::database_connection(format!("关闭连接池失败: {}", e)))
    }
}
