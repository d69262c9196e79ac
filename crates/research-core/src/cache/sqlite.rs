//! SQLite-backed cache implementation.

use super::traits::{expiry_after, CacheBackend, CacheEntry, CacheStats};
use crate::error::{ResearchError, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-based cache backend.
///
/// All entries live in a single `cache_entries` table keyed by the cache key
/// string. Timestamps are stored as Unix milliseconds so expiry comparisons
/// happen in SQL without string formatting concerns.
pub struct SqliteCache {
    /// Database connection (wrapped for thread safety).
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCache").finish_non_exhaustive()
    }
}

impl SqliteCache {
    /// Open (or create) a cache at the specified database path.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ResearchError::Io {
                    message: format!("Failed to create cache directory: {}", e),
                    path: Some(parent.to_path_buf()),
                    source: Some(e),
                })?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| ResearchError::Database {
            message: format!("Failed to open cache database: {}", e),
            source: Some(e),
        })?;

        // WAL lets a reader and a writer from separate processes overlap.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| ResearchError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn)
    }

    /// Create a cache that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ResearchError::Database {
            message: format!("Failed to open in-memory cache: {}", e),
            source: Some(e),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let cache = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ResearchError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }

    /// Insert or replace one row in a single statement.
    fn write(
        &self,
        key: &str,
        value: &Value,
        cached_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO cache_entries (key, value, cached_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                key,
                raw,
                cached_at.timestamp_millis(),
                expires_at.timestamp_millis()
            ],
        )
        .map_err(|e| ResearchError::Database {
            message: format!("Failed to set cache entry: {}", e),
            source: Some(e),
        })?;

        debug!("Cached '{}' until {}", key, expires_at.to_rfc3339());
        Ok(())
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                cached_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cache_expires
                ON cache_entries(expires_at);
            "#,
        )
        .map_err(|e| ResearchError::Database {
            message: format!("Failed to initialize cache schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl CacheBackend for SqliteCache {
    fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();

        let row: Option<(String, i64, i64)> = conn
            .query_row(
                r#"
                SELECT value, cached_at, expires_at
                FROM cache_entries
                WHERE key = ?1 AND expires_at > ?2
                "#,
                params![key, now],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| ResearchError::Database {
                message: format!("Failed to query cache entry: {}", e),
                source: Some(e),
            })?;

        let Some((raw, cached_at, expires_at)) = row else {
            debug!("Cache miss for '{}'", key);
            return Ok(None);
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| ResearchError::Json {
            message: format!("Stored payload for '{}' is not valid JSON: {}", key, e),
            source: Some(e),
        })?;

        debug!("Cache hit for '{}'", key);

        Ok(Some(CacheEntry {
            key: key.to_string(),
            value,
            cached_at: from_millis(cached_at),
            expires_at: from_millis(expires_at),
        }))
    }

    fn set(&self, key: &str, value: &Value, ttl_hours: u32) -> Result<()> {
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl_hours)?;
        self.write(key, value, now, expires_at)
    }

    fn set_with_expiry(
        &self,
        key: &str,
        value: &Value,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.write(key, value, Utc::now(), expires_at)
    }

    fn invalidate(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;

        let deleted = conn
            .execute("DELETE FROM cache_entries WHERE key = ?1", params![key])
            .map_err(|e| ResearchError::Database {
                message: format!("Failed to invalidate cache entry: {}", e),
                source: Some(e),
            })?;

        Ok(deleted > 0)
    }

    fn cleanup_expired(&self) -> Result<usize> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();

        let deleted = conn
            .execute(
                "DELETE FROM cache_entries WHERE expires_at <= ?1",
                params![now],
            )
            .map_err(|e| ResearchError::Database {
                message: format!("Failed to cleanup expired entries: {}", e),
                source: Some(e),
            })?;

        if deleted > 0 {
            debug!("Cleaned up {} expired cache entries", deleted);
        }

        Ok(deleted)
    }

    fn clear_all(&self) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn
            .execute("DELETE FROM cache_entries", [])
            .map_err(|e| ResearchError::Database {
                message: format!("Failed to clear cache entries: {}", e),
                source: Some(e),
            })?;

        debug!("Cleared {} cache entries", deleted);
        Ok(deleted)
    }

    fn stats(&self) -> Result<CacheStats> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();

        let (total, expired, size): (i64, i64, i64) = conn
            .query_row(
                r#"
                SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN expires_at <= ?1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0)
                FROM cache_entries
                "#,
                params![now],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e| ResearchError::Database {
                message: format!("Failed to query cache stats: {}", e),
                source: Some(e),
            })?;

        Ok(CacheStats {
            total_entries: total as usize,
            expired_entries: expired as usize,
            total_size_bytes: size as u64,
        })
    }
}
