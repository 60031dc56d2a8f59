use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // shortened_urls 主表，id 即短码
        let backend = manager.get_database_backend();
        manager.create_table(shortened_urls_table(backend)).await?;

        // owner 二级索引，供按所有者列出
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shortened_urls_owner")
                    .table(ShortenedUrl::Table)
                    .col(ShortenedUrl::Owner)
                    .col(ShortenedUrl::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_shortened_urls_owner")
                    .table(ShortenedUrl::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ShortenedUrl::Table).to_owned())
            .await
    }
}

/// id 与 owner 按字节比较
///
/// MySQL/MariaDB 默认 collation 大小写不敏感，`K1` 会匹配 `k1`。
fn key_column(col: ShortenedUrl, backend: DbBackend) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.string().not_null();
    if backend == DbBackend::MySql {
        def.extra("CHARACTER SET utf8mb4 COLLATE utf8mb4_bin");
    }
    def
}

fn shortened_urls_table(backend: DbBackend) -> TableCreateStatement {
    Table::create()
        .table(ShortenedUrl::Table)
        .if_not_exists()
        .col(key_column(ShortenedUrl::Id, backend))
        .col(ColumnDef::new(ShortenedUrl::Url).text().not_null())
        .col(key_column(ShortenedUrl::Owner, backend))
        .col(ColumnDef::new(ShortenedUrl::Timestamp).string().not_null())
        .primary_key(Index::create().col(ShortenedUrl::Id))
        .to_owned()
}

#[derive(DeriveIden)]
enum ShortenedUrl {
    #[sea_orm(iden = "shortened_urls")]
    Table,
    Id,
    Url,
    Owner,
    Timestamp,
}
