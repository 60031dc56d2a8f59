//! 数据库错误分类与超时控制
//!
//! 存储层不重试：暂时性故障直接上报给调用方，由调用方决定是否重试。
//! 这里只负责把 `DbErr` 分成「暂时性」和「其他」两类，并给每次操作加上超时。

use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// 判断数据库错误是否为暂时性故障（连接、连接池、锁竞争）
pub fn is_transient_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | // 连接池获取失败
        DbErr::Conn(_) => true, // 连接问题
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_transient_runtime_error(runtime_err)
        }
        _ => false,
    }
}

/// 判断运行时错误是否为暂时性（死锁、锁超时等）
fn is_transient_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error()
                && let Some(code) = db_err.code()
            {
                return matches!(
                    code.as_ref(),
                    // MySQL 死锁和锁超时
                    "1213" | "1205" |
                    // PostgreSQL 序列化失败和死锁
                    "40001" | "40P01" |
                    // SQLite BUSY 和 LOCKED
                    "5" | "6"
                );
            }
            // 回退到字符串匹配（用于非 Database 错误）
            is_transient_error_message(&sqlx_err.to_string().to_lowercase())
        }
        RuntimeErr::Internal(msg) => is_transient_error_message(&msg.to_lowercase()),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// 通过错误消息判断（回退方案）
fn is_transient_error_message(err_str: &str) -> bool {
    err_str.contains("deadlock")
        || err_str.contains("lock wait timeout")
        || err_str.contains("database is locked")
        || err_str.contains("serialization failure")
        || err_str.contains("timed out")
}

/// 带超时执行单次存储操作
///
/// 超时被映射为 `DbErr::Conn`，因此会被归类为暂时性故障。
pub async fn with_timeout<T, Fut>(
    operation_name: &str,
    timeout: Duration,
    operation: Fut,
) -> Result<T, DbErr>
where
    Fut: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_elapsed) => {
            warn!(
                "Operation '{}' timed out after {}ms",
                operation_name,
                timeout.as_millis()
            );
            Err(DbErr::Conn(sea_orm::error::RuntimeErr::Internal(format!(
                "Operation '{}' timed out after {}ms",
                operation_name,
                timeout.as_millis()
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ShortkeepError;

    #[test]
    fn test_connection_acquire_is_transient() {
        let err = DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout);
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_conn_is_transient() {
        let err = DbErr::Conn(sea_orm::error::RuntimeErr::Internal(
            "connection lost".to_string(),
        ));
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_record_not_found_is_not_transient() {
        let err = DbErr::RecordNotFound("not found".to_string());
        assert!(!is_transient_error(&err));
    }

    #[test]
    fn test_database_locked_is_transient() {
        let err = DbErr::Query(sea_orm::error::RuntimeErr::Internal(
            "database is locked".to_string(),
        ));
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_deadlock_is_transient() {
        let err = DbErr::Exec(sea_orm::error::RuntimeErr::Internal(
            "Deadlock found when trying to get lock".to_string(),
        ));
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_syntax_error_is_not_transient() {
        let err = DbErr::Exec(sea_orm::error::RuntimeErr::Internal(
            "syntax error near SELECT".to_string(),
        ));
        assert!(!is_transient_error(&err));
    }

    #[test]
    fn test_db_err_converts_by_class() {
        let transient: ShortkeepError =
            DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout).into();
        assert!(transient.is_transient());

        let permanent: ShortkeepError = DbErr::Custom("bad column".to_string()).into();
        assert!(matches!(permanent, ShortkeepError::DatabaseOperation(_)));
        assert!(!permanent.is_transient());
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout("ok_op", Duration::from_secs(1), async {
            Ok::<_, DbErr>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_elapsed_is_transient() {
        let result = with_timeout("slow_op", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, DbErr>(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(is_transient_error(&err));
        assert!(err.to_string().contains("slow_op"));
    }
}
