//! Cache maintenance methods on ResearchApi.

use crate::cache::CacheStats;
use crate::error::Result;
use crate::query::Query;
use crate::ResearchApi;
use tracing::info;

impl ResearchApi {
    // ========================================
    // Cache Methods
    // ========================================

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats()
    }

    /// Delete expired entries. Returns how many were removed.
    pub fn cache_cleanup(&self) -> Result<usize> {
        let removed = self.cache.cleanup_expired()?;
        info!("Removed {} expired cache entries", removed);
        Ok(removed)
    }

    /// Delete every entry. Returns how many were removed.
    pub fn cache_clear(&self) -> Result<usize> {
        let removed = self.cache.clear_all()?;
        info!("Cleared {} cache entries", removed);
        Ok(removed)
    }

    /// Delete one entry by raw key.
    pub fn cache_invalidate(&self, key: &str) -> Result<bool> {
        self.cache.invalidate(key)
    }

    /// Delete the entry a query would be served from.
    pub fn cache_invalidate_query<Q: Query>(&self, query: &Q) -> Result<bool> {
        self.cache.invalidate(&query.cache_key())
    }
}
