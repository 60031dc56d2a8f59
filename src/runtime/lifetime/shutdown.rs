use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::RecordStore;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub async fn listen_for_shutdown(store: Arc<dyn RecordStore>) {
    // 等待 Ctrl+C 信号
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing record store...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    close_store(store.as_ref(), Duration::from_secs(SHUTDOWN_TIMEOUT_SECS)).await;
}

/// 在超时内关闭存储连接
pub async fn close_store(store: &dyn RecordStore, limit: Duration) {
    match timeout(limit, store.close()).await {
        Ok(Ok(())) => {
            info!("Record store '{}' closed", store.backend_name());
        }
        Ok(Err(e)) => {
            error!("Failed to close record store: {}", e);
        }
        Err(_) => {
            error!(
                "Closing record store timed out after {} seconds",
                limit.as_secs()
            );
        }
    }
}
