//! Cache backend trait and types.

use crate::error::{ResearchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached entry with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Fingerprint of the logical query.
    pub key: String,
    /// The cached JSON payload.
    pub value: Value,
    /// When the entry was written.
    pub cached_at: DateTime<Utc>,
    /// When the entry stops being served.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// All stored rows, expired or not.
    pub total_entries: usize,
    /// Rows past their expiry that have not been cleaned up yet.
    pub expired_entries: usize,
    /// Sum of stored payload sizes in bytes.
    pub total_size_bytes: u64,
}

/// `now + ttl_hours`, or a validation error when that is past the last
/// representable date.
pub(crate) fn expiry_after(now: DateTime<Utc>, ttl_hours: u32) -> Result<DateTime<Utc>> {
    now.checked_add_signed(chrono::Duration::hours(i64::from(ttl_hours)))
        .ok_or_else(|| {
            ResearchError::validation(
                "ttl_hours",
                format!("{} hours is past the latest storable expiry", ttl_hours),
            )
        })
}

/// Key-value storage for JSON payloads with per-entry expiry.
///
/// Reads fail closed: a missing or expired key is `Ok(None)`. Expiry is only
/// checked on read; nothing is evicted in the background. Storage faults are
/// returned as errors and are never folded into a miss.
pub trait CacheBackend: Send + Sync {
    /// Get a live payload by key.
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get_entry(key)?.map(|entry| entry.value))
    }

    /// Get a live payload with its metadata.
    fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Store a payload that expires `ttl_hours` from now.
    ///
    /// Overwrites any existing entry with the same key.
    fn set(&self, key: &str, value: &Value, ttl_hours: u32) -> Result<()> {
        let expires_at = expiry_after(Utc::now(), ttl_hours)?;
        self.set_with_expiry(key, value, expires_at)
    }

    /// Store a payload with an explicit expiration time.
    fn set_with_expiry(&self, key: &str, value: &Value, expires_at: DateTime<Utc>)
        -> Result<()>;

    /// Delete one key. Returns whether a row existed.
    fn invalidate(&self, key: &str) -> Result<bool>;

    /// Remove expired rows. Returns the number removed.
    fn cleanup_expired(&self) -> Result<usize>;

    /// Remove every row. Returns the number removed.
    fn clear_all(&self) -> Result<usize>;

    /// Get overall cache statistics.
    fn stats(&self) -> Result<CacheStats>;
}
