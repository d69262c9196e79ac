//! Centralized configuration for the research core.
//!
//! Constants for network behavior, per-source endpoints and cache lifetimes,
//! plus credential lookup from the process environment.

use crate::error::{ResearchError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "research-tools";
    pub const CACHE_DB_FILENAME: &'static str = "cache.sqlite";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const USER_AGENT: &'static str = "research-tools/1.0";
    /// Delay between pages of one fetch sequence.
    pub const PAGE_DELAY: Duration = Duration::from_millis(100);
}

/// Fixed endpoints and page sizes for each source.
pub struct SourceConfig;

impl SourceConfig {
    pub const DEVTO_API_BASE: &'static str = "https://dev.to/api";
    pub const DEVTO_MAX_PER_PAGE: usize = 100;
    pub const DEVTO_TAG_DELAY: Duration = Duration::from_millis(100);

    pub const REDDIT_BASE: &'static str = "https://www.reddit.com";
    pub const REDDIT_PERMALINK_BASE: &'static str = "https://reddit.com";
    pub const REDDIT_USER_AGENT: &'static str = "research-tools/1.0 (research)";
    pub const REDDIT_MAX_PER_PAGE: usize = 100;
    pub const REDDIT_SUBREDDIT_DELAY: Duration = Duration::from_millis(200);

    pub const SERPER_API_BASE: &'static str = "https://google.serper.dev";
    pub const SERPER_LANGUAGE: &'static str = "en";
    pub const SERPER_MAX_PER_PAGE: usize = 100;
}

/// Cache lifetimes per source, in hours.
pub struct CacheTtl;

impl CacheTtl {
    /// Search and autocomplete data changes slowly.
    pub const SERPER_HOURS: u32 = 48;
    pub const REDDIT_HOURS: u32 = 12;
    pub const YOUTUBE_HOURS: u32 = 24;
    pub const DEVTO_HOURS: u32 = 24;
}

/// Credentials and paths resolved from the environment.
#[derive(Clone, Default)]
pub struct ResearchEnv {
    pub devto_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub cache_path: Option<PathBuf>,
}

impl std::fmt::Debug for ResearchEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchEnv")
            .field("has_devto_api_key", &self.devto_api_key.is_some())
            .field("has_serper_api_key", &self.serper_api_key.is_some())
            .field("cache_path", &self.cache_path)
            .finish()
    }
}

impl ResearchEnv {
    pub const DEVTO_API_KEY_VAR: &'static str = "DEVTO_API_KEY";
    pub const SERPER_API_KEY_VAR: &'static str = "SERPER_API_KEY";
    pub const CACHE_PATH_VAR: &'static str = "RESEARCH_TOOLS_CACHE";

    /// Read credentials from the process environment.
    ///
    /// Blank values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            devto_api_key: non_blank(Self::DEVTO_API_KEY_VAR),
            serper_api_key: non_blank(Self::SERPER_API_KEY_VAR),
            cache_path: non_blank(Self::CACHE_PATH_VAR).map(PathBuf::from),
        }
    }

    /// The Serper key, or a configuration error naming the variable.
    pub fn require_serper_key(&self) -> Result<&str> {
        self.serper_api_key
            .as_deref()
            .ok_or_else(|| ResearchError::MissingCredential {
                name: Self::SERPER_API_KEY_VAR.to_string(),
            })
    }

    /// Cache database location: explicit override, else the user cache dir.
    pub fn resolve_cache_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.cache_path {
            return Ok(path.clone());
        }

        dirs::cache_dir()
            .map(|dir| {
                dir.join(AppConfig::APP_NAME)
                    .join(AppConfig::CACHE_DB_FILENAME)
            })
            .ok_or_else(|| ResearchError::Config {
                message: "Could not determine user cache directory".to_string(),
            })
    }
}
