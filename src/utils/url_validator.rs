//! URL 验证模块
//!
//! 只接受带主机名的绝对 http/https URL

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    MissingHost,
    InvalidFormat(String),
    ControlCharacter,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(scheme) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                scheme
            ),
            Self::MissingHost => write!(f, "URL must contain a host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::ControlCharacter => write!(f, "URL contains control characters"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证目标 URL
///
/// 原样存储，不做规范化；解析结果只用于校验。
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // Url::parse 会静默丢弃制表符/换行，存储的原串却不能放进 Location 头
    if url.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    // Url 会把 scheme 转为小写
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

/// 面向客户端的错误消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL cannot be empty",
        UrlValidationError::InvalidProtocol(_) => "URL must start with http:// or https://",
        UrlValidationError::MissingHost
        | UrlValidationError::InvalidFormat(_)
        | UrlValidationError::ControlCharacter => "Invalid URL format",
    }
}
