pub mod url_validator;

pub use url_validator::{UrlValidationError, validate_url, validation_error_message};

/// Route segment that can never be a short id
pub const RESERVED_SHORT_IDS: &[&str] = &["shortened-urls"];

/// 短码只允许 [A-Za-z0-9_.-]，长度 1..=max_len
#[inline]
pub fn is_valid_short_id(id: &str, max_len: usize) -> bool {
    !id.is_empty()
        && id.len() <= max_len
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

#[inline]
pub fn is_reserved_short_id(id: &str) -> bool {
    RESERVED_SHORT_IDS.contains(&id)
}
