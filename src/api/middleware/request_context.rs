//! Request context middleware
//!
//! 为每个请求生成 UUID 并注入 tracing span，同时从配置的身份头中读取
//! 上游网关已认证的调用方身份，存入 request extensions。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{Instrument, info_span, trace};
use uuid::Uuid;

use super::identity::CallerIdentity;
use crate::config::get_config;

/// 响应头名称
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request context 中间件工厂
#[derive(Clone)]
pub struct RequestContext {
    identity_header: Rc<str>,
}

impl RequestContext {
    pub fn new(identity_header: impl AsRef<str>) -> Self {
        Self {
            identity_header: Rc::from(identity_header.as_ref().to_ascii_lowercase()),
        }
    }

    /// 使用 `api.identity_header`
    pub fn from_config() -> Self {
        Self::new(&get_config().api.identity_header)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextService {
            service: Rc::new(service),
            identity_header: self.identity_header.clone(),
        }))
    }
}

pub struct RequestContextService<S> {
    service: Rc<S>,
    identity_header: Rc<str>,
}

impl<S> RequestContextService<S> {
    /// 缺失、空白或非 ASCII 的身份头都视为未认证
    fn extract_identity(&self, req: &ServiceRequest) -> Option<CallerIdentity> {
        req.headers()
            .get(&*self.identity_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(CallerIdentity::new)
    }
}

impl<S, B> Service<ServiceRequest> for RequestContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        let request_id = Uuid::new_v4().to_string();

        if let Some(identity) = self.extract_identity(&req) {
            req.extensions_mut().insert(identity);
        }

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;
                trace!("Response status: {}", response.status());

                if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
