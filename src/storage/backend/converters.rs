use crate::storage::ShortenedUrl;
use migration::entities::shortened_url;

/// 将 Sea-ORM Model 转换为 ShortenedUrl
pub fn model_to_record(model: shortened_url::Model) -> ShortenedUrl {
    ShortenedUrl {
        id: model.id,
        url: model.url,
        timestamp: model.timestamp,
        owner: model.owner,
    }
}

/// 将 ShortenedUrl 转换为 ActiveModel（仅用于插入）
pub fn record_to_active_model(record: &ShortenedUrl) -> shortened_url::ActiveModel {
    use sea_orm::ActiveValue::Set;

    shortened_url::ActiveModel {
        id: Set(record.id.clone()),
        url: Set(record.url.clone()),
        owner: Set(record.owner.clone()),
        timestamp: Set(record.timestamp.clone()),
    }
}
