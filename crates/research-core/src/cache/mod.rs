//! Expiring response cache.
//!
//! Fetched results are stored as JSON under a fingerprint of the logical
//! query that produced them. Each source picks its own TTL at write time.

mod sqlite;
mod traits;

pub use sqlite::SqliteCache;
pub use traits::{CacheBackend, CacheEntry, CacheStats};
