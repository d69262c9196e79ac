//! Builder for configuring ResearchApi initialization.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{CacheBackend, SqliteCache};
use crate::config::ResearchEnv;
use crate::error::Result;
use crate::sources::{DevToSource, Pacing, RedditSource, SerperSource, YouTubeSource};
use crate::ResearchApi;

enum CacheChoice {
    /// `RESEARCH_TOOLS_CACHE` or the user cache directory.
    Default,
    Path(PathBuf),
    Memory,
    Backend(Arc<dyn CacheBackend>),
}

/// Builder for configuring ResearchApi initialization.
///
/// # Example
///
/// ```rust,ignore
/// use research_core::{Pacing, ResearchApi};
///
/// let api = ResearchApi::builder()
///     .cache_path("/tmp/research/cache.sqlite")
///     .with_pacing(Pacing::none())
///     .build()?;
/// ```
pub struct ResearchApiBuilder {
    env: ResearchEnv,
    cache: CacheChoice,
    pacing: Option<Pacing>,
    devto_base_url: Option<String>,
    reddit_base_url: Option<String>,
    serper_base_url: Option<String>,
}

impl ResearchApiBuilder {
    /// Create a builder using the given credentials.
    pub fn new(env: ResearchEnv) -> Self {
        Self {
            env,
            cache: CacheChoice::Default,
            pacing: None,
            devto_base_url: None,
            reddit_base_url: None,
            serper_base_url: None,
        }
    }

    /// Replace the credentials and cache location.
    pub fn with_env(mut self, env: ResearchEnv) -> Self {
        self.env = env;
        self
    }

    /// Store the cache database at `path`.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache = CacheChoice::Path(path.into());
        self
    }

    /// Keep the cache in memory for the lifetime of the API.
    pub fn in_memory_cache(mut self) -> Self {
        self.cache = CacheChoice::Memory;
        self
    }

    /// Use an existing cache backend.
    pub fn with_cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = CacheChoice::Backend(cache);
        self
    }

    /// Override request pacing for every source.
    ///
    /// Default: each source's own delays.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = Some(pacing);
        self
    }

    pub fn devto_base_url(mut self, url: impl Into<String>) -> Self {
        self.devto_base_url = Some(url.into());
        self
    }

    pub fn reddit_base_url(mut self, url: impl Into<String>) -> Self {
        self.reddit_base_url = Some(url.into());
        self
    }

    /// Base URL for Serper, used by both Google and YouTube queries.
    pub fn serper_base_url(mut self, url: impl Into<String>) -> Self {
        self.serper_base_url = Some(url.into());
        self
    }

    fn open_cache(&self) -> Result<Arc<dyn CacheBackend>> {
        let cache: Arc<dyn CacheBackend> = match &self.cache {
            CacheChoice::Default => Arc::new(SqliteCache::new(self.env.resolve_cache_path()?)?),
            CacheChoice::Path(path) => Arc::new(SqliteCache::new(path)?),
            CacheChoice::Memory => Arc::new(SqliteCache::in_memory()?),
            CacheChoice::Backend(cache) => cache.clone(),
        };
        Ok(cache)
    }

    /// Build the ResearchApi instance.
    pub fn build(self) -> Result<ResearchApi> {
        let cache = self.open_cache()?;

        let mut devto = DevToSource::new(self.env.devto_api_key.clone())?;
        let mut reddit = RedditSource::new()?;
        let mut serper = SerperSource::new(self.env.serper_api_key.clone())?;
        let mut youtube = YouTubeSource::new(self.env.serper_api_key.clone())?;

        if let Some(url) = &self.devto_base_url {
            devto = devto.with_base_url(url.as_str());
        }
        if let Some(url) = &self.reddit_base_url {
            reddit = reddit.with_base_url(url.as_str());
        }
        if let Some(url) = &self.serper_base_url {
            serper = serper.with_base_url(url.as_str());
            youtube = youtube.with_base_url(url.as_str());
        }
        if let Some(pacing) = self.pacing {
            devto = devto.with_pacing(pacing);
            reddit = reddit.with_pacing(pacing);
            youtube = youtube.with_pacing(pacing);
        }

        tracing::debug!("Research API ready ({:?})", self.env);

        Ok(ResearchApi {
            cache,
            devto,
            serper,
            reddit,
            youtube,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_with_cache_path_creates_database() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("cache.sqlite");

        let api = ResearchApiBuilder::new(ResearchEnv::default())
            .cache_path(&path)
            .build()
            .unwrap();

        assert!(path.exists());
        assert_eq!(api.cache_stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_env_cache_path_is_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.sqlite");
        let env = ResearchEnv {
            cache_path: Some(path.clone()),
            ..Default::default()
        };

        ResearchApiBuilder::new(env).build().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_shared_backend() {
        let backend: Arc<dyn CacheBackend> = Arc::new(SqliteCache::in_memory().unwrap());
        backend
            .set("k", &serde_json::json!(1), 1)
            .unwrap();

        let api = ResearchApiBuilder::new(ResearchEnv::default())
            .with_cache(backend)
            .build()
            .unwrap();
        assert_eq!(api.cache_stats().unwrap().total_entries, 1);
    }
}
