use std::str::FromStr;
use std::time::Duration;

use sea_orm::sqlx::SqlitePool;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use tracing::{debug, info};

use crate::errors::{Result, ShortkeepError};
use migration::{Migrator, MigratorTrait};

/// SQLite 连接参数
///
/// `lock_wait` 即 busy_timeout：写锁被占用时最多等待这么久再报 SQLITE_BUSY。
fn sqlite_options(database_url: &str, lock_wait: Duration) -> Result<SqliteConnectOptions> {
    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| ShortkeepError::database_config(format!("SQLite URL 解析失败: {}", e)))?;

    Ok(opt
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(lock_wait)
        .pragma("temp_store", "memory"))
}

/// 连接 SQLite 数据库（自动建库，WAL）
pub async fn connect_sqlite(database_url: &str, lock_wait: Duration) -> Result<DatabaseConnection> {
    let pool = SqlitePool::connect_with(sqlite_options(database_url, lock_wait)?)
        .await
        .map_err(|e| {
            ShortkeepError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
        })?;

    debug!("SQLite pool ready, busy_timeout={:?}", lock_wait);
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 连接 MySQL/PostgreSQL
pub async fn connect_generic(
    database_url: &str,
    backend_name: &str,
    pool_size: u32,
) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(pool_size)
        .min_connections(pool_size.min(5))
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        ShortkeepError::database_connection(format!(
            "无法连接到 {} 数据库: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| ShortkeepError::database_operation(format!("迁移失败: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}
