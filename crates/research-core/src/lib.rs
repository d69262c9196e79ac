//! Research Core - content research data from dev.to, Google, Reddit and YouTube.
//!
//! This crate fetches engagement data from several public services, folds it
//! into typed results, and keeps those results in a local expiring cache so
//! repeated questions do not hit the network. It has no CLI or RPC layer of
//! its own; front ends call [`ResearchApi`] and render what comes back.
//!
//! # Example
//!
//! ```rust,ignore
//! use research_core::{DevToTrendingQuery, ResearchApi};
//!
//! #[tokio::main]
//! async fn main() -> research_core::Result<()> {
//!     let api = ResearchApi::new()?;
//!
//!     let trending = api
//!         .devto_trending(
//!             &DevToTrendingQuery {
//!                 tags: vec!["rust".into()],
//!                 ..Default::default()
//!             },
//!             false,
//!         )
//!         .await?;
//!     println!("{} articles (cached: {})", trending.count, trending.cached);
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod sources;

mod api;

// Re-export commonly used types
pub use cache::{CacheBackend, CacheEntry, CacheStats, SqliteCache};
pub use config::ResearchEnv;
pub use error::{ResearchError, Result};
pub use models::{
    Article, AuthorReport, AuthorStats, Cached, KeywordSuggestions, OrganicResult,
    PeopleAlsoAsk, PeopleAlsoAskList, RedditListing, RedditPeriod, RedditPost, RedditSort,
    RelatedSearches, SerpAnalysis, TagReport, TagStats, TrendingArticles, VideoListing,
    VideoResult,
};
pub use query::{
    ChannelQuery, DevToAuthorsQuery, DevToTagsQuery, DevToTrendingQuery, KeywordsQuery,
    PaaQuery, Query, RedditQuery, RelatedQuery, SerpQuery, TrendingVideosQuery,
    VideoSearchQuery,
};
pub use sources::{Fetch, Pacing};

// Re-export builder from api module
pub use api::ResearchApiBuilder;

use std::sync::Arc;

/// Main entry point for research queries.
///
/// Every query method follows the same read-through path: compute the cache
/// key, serve a live cached result if there is one, otherwise fetch, store
/// and return the fresh result. Results come back wrapped in [`Cached`] so
/// callers can tell which path was taken.
pub struct ResearchApi {
    cache: Arc<dyn CacheBackend>,
    devto: sources::DevToSource,
    serper: sources::SerperSource,
    reddit: sources::RedditSource,
    youtube: sources::YouTubeSource,
}

impl ResearchApi {
    /// Create a builder seeded from the process environment.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let api = ResearchApi::builder()
    ///     .in_memory_cache()
    ///     .build()?;
    /// ```
    pub fn builder() -> ResearchApiBuilder {
        ResearchApiBuilder::new(ResearchEnv::from_env())
    }

    /// Create an instance with credentials and cache location from the
    /// environment.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// The cache this instance reads and writes.
    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        &self.cache
    }
}
