use crate::services::UrlService;
use crate::storage::{RecordStore, StorageFactory};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub struct StartupContext {
    pub store: Arc<dyn RecordStore>,
    pub url_service: Arc<UrlService>,
}

/// 准备服务器启动的上下文
/// 包括存储（SQL 后端会执行迁移）和业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let store = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    let url_service = Arc::new(UrlService::new(store.clone()));

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { store, url_service })
}
