//! Shortened URL endpoints
//!
//! - `GET    /shortened-urls`  list the caller's links
//! - `POST   /shortened-urls`  create-if-absent
//! - `GET    /{id}`            301 redirect
//! - `DELETE /{id}`            owner-scoped delete

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, LOCATION};
use actix_web::{HttpResponse, Responder, error::InternalError, web};
use serde::Deserialize;
use tracing::{debug, trace};

use super::response::{
    MSG_ALREADY_EXISTS, MSG_DOES_NOT_EXIST, MSG_INVALID_BODY, error_body_response,
    error_from_shortkeep, not_found_response,
};
use crate::api::middleware::CallerIdentity;
use crate::config::get_config;
use crate::services::{CreateOutcome, DeleteOutcome, ResolveOutcome, UrlService};
use crate::utils::{
    is_reserved_short_id, is_valid_short_id, validate_url, validation_error_message,
};

/// JSON body 上限
pub const MAX_JSON_PAYLOAD: usize = 64 * 1024;

/// `POST /shortened-urls` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortenedUrlRequest {
    pub short_id: String,
    pub url: String,
}

impl CreateShortenedUrlRequest {
    /// 返回面向客户端的错误消息
    fn validate(&self, max_short_id_length: usize) -> Result<(), String> {
        if !is_valid_short_id(&self.short_id, max_short_id_length) {
            return Err(format!(
                "shortId must be 1-{} characters of [A-Za-z0-9_.-]",
                max_short_id_length
            ));
        }
        if is_reserved_short_id(&self.short_id) {
            return Err(format!("shortId '{}' is reserved", self.short_id));
        }
        validate_url(&self.url).map_err(|e| validation_error_message(&e).to_string())
    }
}

/// 路径中的 id 是否可能存在于存储中
fn is_addressable(id: &str) -> bool {
    is_valid_short_id(id, get_config().api.max_short_id_length) && !is_reserved_short_id(id)
}

pub struct UrlHandlers;

impl UrlHandlers {
    pub async fn list_shortened_urls(
        identity: CallerIdentity,
        service: web::Data<Arc<UrlService>>,
    ) -> impl Responder {
        match service.list_shortened_urls_by_owner(identity.as_str()).await {
            Ok(records) => HttpResponse::Ok().json(records),
            Err(e) => error_from_shortkeep(&e),
        }
    }

    pub async fn create_shortened_url(
        identity: CallerIdentity,
        body: web::Json<CreateShortenedUrlRequest>,
        service: web::Data<Arc<UrlService>>,
    ) -> impl Responder {
        let request = body.into_inner();

        if let Err(message) = request.validate(get_config().api.max_short_id_length) {
            debug!("Rejected create request: {}", message);
            return error_body_response(StatusCode::BAD_REQUEST, message);
        }

        match service
            .create_shortened_url(&request.short_id, &request.url, identity.as_str())
            .await
        {
            Ok(CreateOutcome::Created(record)) => HttpResponse::Ok().json(record),
            Ok(CreateOutcome::AlreadyExists) => {
                error_body_response(StatusCode::OK, MSG_ALREADY_EXISTS)
            }
            Err(e) => error_from_shortkeep(&e),
        }
    }

    pub async fn redirect(
        path: web::Path<String>,
        service: web::Data<Arc<UrlService>>,
    ) -> impl Responder {
        let id = path.into_inner();

        if !is_addressable(&id) {
            // 非法短码，直接 404，不访问存储
            trace!("Invalid short id rejected: {}", id);
            return not_found_response();
        }

        match service.resolve_shortened_url(&id).await {
            Ok(ResolveOutcome::Found(url)) => HttpResponse::MovedPermanently()
                .insert_header((LOCATION, url))
                .insert_header((
                    CACHE_CONTROL,
                    format!("max-age={}", get_config().api.redirect_max_age),
                ))
                .finish(),
            Ok(ResolveOutcome::NotFound) => not_found_response(),
            Err(e) => error_from_shortkeep(&e),
        }
    }

    pub async fn delete_shortened_url(
        identity: CallerIdentity,
        path: web::Path<String>,
        service: web::Data<Arc<UrlService>>,
    ) -> impl Responder {
        let id = path.into_inner();

        if !is_addressable(&id) {
            trace!("Invalid short id rejected on delete: {}", id);
            return error_body_response(StatusCode::OK, MSG_DOES_NOT_EXIST);
        }

        match service
            .delete_shortened_url(&id, identity.as_str())
            .await
        {
            Ok(DeleteOutcome::Deleted) => HttpResponse::Ok().finish(),
            Ok(DeleteOutcome::NotFoundOrNotOwner) => {
                error_body_response(StatusCode::OK, MSG_DOES_NOT_EXIST)
            }
            Err(e) => error_from_shortkeep(&e),
        }
    }
}

/// 畸形 JSON、缺字段、超限都统一为 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(|err, _req| {
            debug!("Invalid JSON body: {}", err);
            InternalError::from_response(
                err,
                error_body_response(StatusCode::BAD_REQUEST, MSG_INVALID_BODY),
            )
            .into()
        })
}

/// `/shortened-urls` 必须先于 `/{id}` 注册
pub fn url_routes() -> actix_web::Scope {
    web::scope("")
        .app_data(json_config())
        .route(
            "/shortened-urls",
            web::get().to(UrlHandlers::list_shortened_urls),
        )
        .route(
            "/shortened-urls",
            web::post().to(UrlHandlers::create_shortened_url),
        )
        .route("/{id}", web::get().to(UrlHandlers::redirect))
        .route("/{id}", web::head().to(UrlHandlers::redirect))
        .route("/{id}", web::delete().to(UrlHandlers::delete_shortened_url))
}
