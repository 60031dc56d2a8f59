//! Response helpers
//!
//! Domain outcomes always render as well-formed 200/301/404 responses.
//! Only infrastructure failures reach `error_from_shortkeep`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::ShortkeepError;

pub const MSG_ALREADY_EXISTS: &str = "URL link already exists";
pub const MSG_DOES_NOT_EXIST: &str = "URL link does not exist";
pub const MSG_INVALID_BODY: &str = "Invalid request body";
pub const MSG_UNAVAILABLE: &str = "Service temporarily unavailable";
pub const MSG_INTERNAL: &str = "Internal server error";

/// `{"error": true, "message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// 构建 JSON 错误体响应
pub fn error_body_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ErrorBody::new(message))
}

pub fn not_found_response() -> HttpResponse {
    HttpResponse::build(StatusCode::NOT_FOUND)
        .insert_header((CONTENT_TYPE, "text/html; charset=utf-8"))
        .body("Not Found")
}

/// 暂时性故障 → 503 + Retry-After，其余 → 500
pub fn error_from_shortkeep(err: &ShortkeepError) -> HttpResponse {
    error!("Request failed: {}", err.format_simple());

    if err.is_transient() {
        HttpResponse::build(StatusCode::SERVICE_UNAVAILABLE)
            .insert_header((RETRY_AFTER, "1"))
            .json(ErrorBody::new(MSG_UNAVAILABLE))
    } else {
        error_body_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_maps_to_503() {
        let resp = error_from_shortkeep(&ShortkeepError::store_unavailable("pool timed out"));
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers().get(RETRY_AFTER).unwrap(), "1");
    }

    #[test]
    fn test_other_errors_map_to_500() {
        for err in [
            ShortkeepError::invariant_violation("id mismatch"),
            ShortkeepError::database_operation("syntax error"),
        ] {
            let resp = error_from_shortkeep(&err);
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(resp.headers().get(RETRY_AFTER).is_none());
        }
    }

    #[test]
    fn test_error_body_shape() {
        let value = serde_json::to_value(ErrorBody::new(MSG_ALREADY_EXISTS)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "error": true, "message": "URL link already exists" })
        );
    }
}
