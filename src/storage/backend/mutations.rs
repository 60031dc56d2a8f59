//! Conditional write operations for SeaOrmStorage
//!
//! Each predicate becomes one statement; "rows affected == 0" is the
//! predicate failure signal.

use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, sea_query::OnConflict};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::classify::with_timeout;
use super::converters::record_to_active_model;
use crate::errors::{Result, ShortkeepError};
use crate::storage::ShortenedUrl;

use migration::entities::shortened_url;

impl SeaOrmStorage {
    /// INSERT … ON CONFLICT(id) DO NOTHING
    pub(super) async fn insert_if_absent(&self, record: ShortenedUrl) -> Result<ShortenedUrl> {
        let db = &self.db;
        let active_model = record_to_active_model(&record);

        let result = with_timeout(
            &format!("insert_if_absent({})", record.id),
            self.op_timeout,
            shortened_url::Entity::insert(active_model)
                .on_conflict(
                    OnConflict::column(shortened_url::Column::Id)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db),
        )
        .await;

        match result {
            Ok(0) | Err(DbErr::RecordNotInserted) => {
                debug!("Conditional insert rejected, id exists: {}", record.id);
                Err(ShortkeepError::predicate_failed(format!(
                    "put({}) rejected by NotExists",
                    record.id
                )))
            }
            Ok(_) => {
                info!("Shortened URL inserted: {}", record.id);
                Ok(record)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// DELETE … WHERE id = ? AND owner = ?
    pub(super) async fn delete_if_owner(&self, id: &str, owner: &str) -> Result<()> {
        let db = &self.db;

        let result = with_timeout(
            &format!("delete_if_owner({})", id),
            self.op_timeout,
            shortened_url::Entity::delete_many()
                .filter(shortened_url::Column::Id.eq(id))
                .filter(shortened_url::Column::Owner.eq(owner))
                .exec(db),
        )
        .await?;

        // 记录不存在与 owner 不匹配都表现为 0 行
        if result.rows_affected == 0 {
            return Err(ShortkeepError::predicate_failed(format!(
                "delete({}) rejected by OwnerEquals",
                id
            )));
        }

        info!("Shortened URL deleted: {}", id);
        Ok(())
    }
}
