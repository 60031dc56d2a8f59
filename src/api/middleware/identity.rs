//! Caller identity extractor

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload,
    error::InternalError,
};
use futures_util::future::{Ready, ready};
use serde_json::json;
use tracing::debug;

/// 上游已认证的调用方身份（不透明的 owner token）
///
/// 由 `RequestContext` 写入 request extensions。需要身份的 handler
/// 直接把它作为参数，缺失时返回 403。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for CallerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<CallerIdentity>().cloned();
        ready(identity.ok_or_else(|| {
            debug!("Rejected request without caller identity: {}", req.path());
            InternalError::from_response(
                "missing caller identity",
                HttpResponse::Forbidden().json(json!({ "message": "Forbidden" })),
            )
            .into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[actix_rt::test]
    async fn test_extracts_identity_from_extensions() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(CallerIdentity::new("k1"));

        let identity = CallerIdentity::extract(&req).await.unwrap();
        assert_eq!(identity.as_str(), "k1");
    }

    #[actix_rt::test]
    async fn test_missing_identity_is_forbidden() {
        let req = test::TestRequest::default().to_http_request();

        let err = CallerIdentity::extract(&req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().error_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
