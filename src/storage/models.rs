use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored short link.
///
/// Serialized as `{id, url, timestamp, owner}` in every HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenedUrl {
    pub id: String,
    pub url: String,
    pub timestamp: String,
    pub owner: String,
}

impl ShortenedUrl {
    /// Build a new record stamped with the current time.
    pub fn new(id: impl Into<String>, url: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::with_timestamp(id, url, owner, Utc::now())
    }

    pub fn with_timestamp(
        id: impl Into<String>,
        url: impl Into<String>,
        owner: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            timestamp: format_timestamp(at),
            owner: owner.into(),
        }
    }
}

/// RFC 3339, UTC, millisecond precision, `Z` suffix.
///
/// Fixed width, so lexicographic order equals chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Condition evaluated atomically against the current record for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// No record exists for the key.
    NotExists,
    /// A record exists and its owner equals the given principal.
    OwnerEquals(String),
}

impl Predicate {
    pub fn owner_equals(owner: impl Into<String>) -> Self {
        Predicate::OwnerEquals(owner.into())
    }

    pub fn holds(&self, current: Option<&ShortenedUrl>) -> bool {
        match (self, current) {
            (Predicate::NotExists, None) => true,
            (Predicate::OwnerEquals(owner), Some(record)) => record.owner == *owner,
            _ => false,
        }
    }
}
