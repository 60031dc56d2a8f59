//! Read-only operations for SeaOrmStorage

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{error, trace};

use super::SeaOrmStorage;
use super::classify::with_timeout;
use super::converters::model_to_record;
use crate::errors::Result;
use crate::storage::ShortenedUrl;

use migration::entities::shortened_url;

impl SeaOrmStorage {
    pub(super) async fn find_by_id(&self, id: &str) -> Result<Option<ShortenedUrl>> {
        let db = &self.db;

        let model = with_timeout(
            &format!("get({})", id),
            self.op_timeout,
            shortened_url::Entity::find_by_id(id.to_string()).one(db),
        )
        .await
        .inspect_err(|e| error!("Failed to query shortened URL {}: {}", id, e))?;

        trace!("get({}) hit: {}", id, model.is_some());
        Ok(model.map(model_to_record))
    }

    /// 走 owner 索引，按创建时间排序
    pub(super) async fn find_by_owner(&self, owner: &str) -> Result<Vec<ShortenedUrl>> {
        let db = &self.db;

        let models = with_timeout(
            "query_by_owner",
            self.op_timeout,
            shortened_url::Entity::find()
                .filter(shortened_url::Column::Owner.eq(owner))
                .order_by_asc(shortened_url::Column::Timestamp)
                .order_by_asc(shortened_url::Column::Id)
                .all(db),
        )
        .await
        .inspect_err(|e| error!("Failed to list shortened URLs by owner: {}", e))?;

        Ok(models.into_iter().map(model_to_record).collect())
    }
}
