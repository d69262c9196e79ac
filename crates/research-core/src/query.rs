//! Logical queries and their cache fingerprints.
//!
//! Every query knows its cache key, the schema tag its cached payload is
//! stored under, and how long that payload stays fresh. Keys are
//! colon-delimited `source:operation:params`. Free-text parameters are trimmed
//! and lower-cased; list parameters are additionally sorted and comma-joined,
//! so the same request in any order or casing shares one entry. `%`, `:` and
//! `,` inside a parameter are percent-escaped.

use crate::config::CacheTtl;
use crate::error::{ResearchError, Result};
use crate::models::{
    AuthorReport, KeywordSuggestions, PeopleAlsoAskList, RedditListing, RedditPeriod,
    RedditSort, RelatedSearches, SerpAnalysis, TagReport, TrendingArticles, VideoListing,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default region for Google and YouTube lookups.
pub const DEFAULT_REGION: &str = "us";

/// A logical request whose result can be cached.
pub trait Query: Send + Sync {
    /// The typed result this query produces.
    type Output: Serialize + DeserializeOwned + Send;

    /// Schema tag (`source:operation`) written alongside cached payloads.
    const SCHEMA: &'static str;

    /// Lifetime of a cached result.
    const TTL_HOURS: u32;

    /// Deterministic fingerprint of the request parameters.
    fn cache_key(&self) -> String;

    /// Reject unusable input before any I/O happens.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Trim, lower-case, drop blanks and duplicates. Keeps caller order.
pub fn normalize_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_ref().trim().to_lowercase();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Percent-escape the key delimiters so one parameter cannot spill into the
/// next field.
fn escape_key_part(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3a"),
            ',' => out.push_str("%2c"),
            _ => out.push(c),
        }
    }
    out
}

fn key_list<S: AsRef<str>>(values: &[S]) -> String {
    let mut values: Vec<String> = normalize_list(values)
        .iter()
        .map(|v| escape_key_part(v))
        .collect();
    values.sort();
    values.join(",")
}

fn key_list_or_all<S: AsRef<str>>(values: &[S]) -> String {
    let joined = key_list(values);
    if joined.is_empty() {
        "all".to_string()
    } else {
        joined
    }
}

fn key_text(value: &str) -> String {
    escape_key_part(&value.trim().to_lowercase())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ResearchError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_limit(field: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(ResearchError::validation(field, "must be at least 1"));
    }
    Ok(())
}

fn require_period(days: u32) -> Result<()> {
    if days == 0 {
        return Err(ResearchError::validation("period", "must be at least 1 day"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// dev.to
// ---------------------------------------------------------------------------

/// Trending dev.to articles, optionally filtered by tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToTrendingQuery {
    pub tags: Vec<String>,
    /// Window in days.
    pub period: u32,
    pub limit: usize,
}

impl Default for DevToTrendingQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            period: 7,
            limit: 20,
        }
    }
}

impl Query for DevToTrendingQuery {
    type Output = TrendingArticles;
    const SCHEMA: &'static str = "devto:trending";
    const TTL_HOURS: u32 = CacheTtl::DEVTO_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "devto:trending:{}:{}:{}",
            key_list_or_all(&self.tags),
            self.period,
            self.limit
        )
    }

    fn validate(&self) -> Result<()> {
        require_period(self.period)?;
        require_limit("limit", self.limit)
    }
}

/// Engagement comparison across dev.to tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToTagsQuery {
    pub tags: Vec<String>,
    pub period: u32,
    /// Maximum number of tags reported.
    pub limit: usize,
}

impl Default for DevToTagsQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            period: 7,
            limit: 10,
        }
    }
}

impl Query for DevToTagsQuery {
    type Output = TagReport;
    const SCHEMA: &'static str = "devto:tags";
    const TTL_HOURS: u32 = CacheTtl::DEVTO_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "devto:tags:{}:{}:{}",
            key_list(&self.tags),
            self.period,
            self.limit
        )
    }

    fn validate(&self) -> Result<()> {
        if normalize_list(&self.tags).is_empty() {
            return Err(ResearchError::validation("tags", "at least one tag is required"));
        }
        require_period(self.period)?;
        require_limit("limit", self.limit)
    }
}

/// Top dev.to authors by total reactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToAuthorsQuery {
    pub tags: Vec<String>,
    pub period: u32,
    /// Maximum number of authors reported.
    pub limit: usize,
}

impl Default for DevToAuthorsQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            period: 7,
            limit: 10,
        }
    }
}

impl Query for DevToAuthorsQuery {
    type Output = AuthorReport;
    const SCHEMA: &'static str = "devto:authors";
    const TTL_HOURS: u32 = CacheTtl::DEVTO_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "devto:authors:{}:{}:{}",
            key_list_or_all(&self.tags),
            self.period,
            self.limit
        )
    }

    fn validate(&self) -> Result<()> {
        require_period(self.period)?;
        require_limit("limit", self.limit)
    }
}

/// Articles fetched for aggregation: at least 100, or ten per reported row.
pub fn aggregate_sample_size(limit: usize) -> usize {
    limit.saturating_mul(10).max(100)
}

// ---------------------------------------------------------------------------
// Serper (Google)
// ---------------------------------------------------------------------------

/// Google autocomplete for a seed keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordsQuery {
    pub query: String,
}

impl Query for KeywordsQuery {
    type Output = KeywordSuggestions;
    const SCHEMA: &'static str = "serper:keywords";
    const TTL_HOURS: u32 = CacheTtl::SERPER_HOURS;

    fn cache_key(&self) -> String {
        format!("serper:keywords:{}", key_text(&self.query))
    }

    fn validate(&self) -> Result<()> {
        require_text("query", &self.query)
    }
}

/// Organic results, PAA and related searches for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerpQuery {
    pub query: String,
    /// Number of organic results requested.
    pub num: usize,
    /// Country code.
    pub gl: String,
}

impl Default for SerpQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            num: 10,
            gl: DEFAULT_REGION.to_string(),
        }
    }
}

impl Query for SerpQuery {
    type Output = SerpAnalysis;
    const SCHEMA: &'static str = "serper:serp";
    const TTL_HOURS: u32 = CacheTtl::SERPER_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "serper:serp:{}:{}:{}",
            key_text(&self.query),
            self.num,
            key_text(&self.gl)
        )
    }

    fn validate(&self) -> Result<()> {
        require_text("query", &self.query)?;
        require_limit("num", self.num)
    }
}

/// "People Also Ask" questions for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaaQuery {
    pub query: String,
    pub gl: String,
}

impl Default for PaaQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            gl: DEFAULT_REGION.to_string(),
        }
    }
}

impl Query for PaaQuery {
    type Output = PeopleAlsoAskList;
    const SCHEMA: &'static str = "serper:paa";
    const TTL_HOURS: u32 = CacheTtl::SERPER_HOURS;

    fn cache_key(&self) -> String {
        format!("serper:paa:{}:{}", key_text(&self.query), key_text(&self.gl))
    }

    fn validate(&self) -> Result<()> {
        require_text("query", &self.query)
    }
}

/// Related searches for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedQuery {
    pub query: String,
    pub gl: String,
}

impl Default for RelatedQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            gl: DEFAULT_REGION.to_string(),
        }
    }
}

impl Query for RelatedQuery {
    type Output = RelatedSearches;
    const SCHEMA: &'static str = "serper:related";
    const TTL_HOURS: u32 = CacheTtl::SERPER_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "serper:related:{}:{}",
            key_text(&self.query),
            key_text(&self.gl)
        )
    }

    fn validate(&self) -> Result<()> {
        require_text("query", &self.query)
    }
}

// ---------------------------------------------------------------------------
// Reddit
// ---------------------------------------------------------------------------

/// Posts from one or more subreddits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditQuery {
    pub subreddits: Vec<String>,
    pub sort: RedditSort,
    /// Only sent upstream for `top` and `controversial`.
    pub period: RedditPeriod,
    pub limit: usize,
}

impl Default for RedditQuery {
    fn default() -> Self {
        Self {
            subreddits: Vec::new(),
            sort: RedditSort::Hot,
            period: RedditPeriod::Week,
            limit: 25,
        }
    }
}

impl Query for RedditQuery {
    type Output = RedditListing;
    const SCHEMA: &'static str = "reddit:posts";
    const TTL_HOURS: u32 = CacheTtl::REDDIT_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "reddit:{}:{}:{}:{}",
            key_list(&self.subreddits),
            self.sort,
            self.period,
            self.limit
        )
    }

    fn validate(&self) -> Result<()> {
        if normalize_list(&self.subreddits).is_empty() {
            return Err(ResearchError::validation(
                "subreddits",
                "at least one subreddit is required",
            ));
        }
        require_limit("limit", self.limit)
    }
}

// ---------------------------------------------------------------------------
// YouTube
// ---------------------------------------------------------------------------

/// Free-text video search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSearchQuery {
    pub query: String,
    pub limit: usize,
    pub region: String,
}

impl Default for VideoSearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: 20,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl Query for VideoSearchQuery {
    type Output = VideoListing;
    const SCHEMA: &'static str = "youtube:search";
    const TTL_HOURS: u32 = CacheTtl::YOUTUBE_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "youtube:search:{}:{}:{}",
            key_text(&self.query),
            self.limit,
            key_text(&self.region)
        )
    }

    fn validate(&self) -> Result<()> {
        require_text("query", &self.query)?;
        require_limit("limit", self.limit)
    }
}

/// Videos published by a named channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelQuery {
    pub channel: String,
    pub limit: usize,
    pub region: String,
}

impl Default for ChannelQuery {
    fn default() -> Self {
        Self {
            channel: String::new(),
            limit: 20,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl ChannelQuery {
    /// Search string sent upstream.
    pub fn search_text(&self) -> String {
        format!("\"{}\" site:youtube.com", self.channel.trim())
    }
}

impl Query for ChannelQuery {
    type Output = VideoListing;
    const SCHEMA: &'static str = "youtube:channel";
    const TTL_HOURS: u32 = CacheTtl::YOUTUBE_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "youtube:channel:{}:{}:{}",
            key_text(&self.channel),
            self.limit,
            key_text(&self.region)
        )
    }

    fn validate(&self) -> Result<()> {
        require_text("channel", &self.channel)?;
        require_limit("limit", self.limit)
    }
}

/// Currently trending videos, optionally within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingVideosQuery {
    pub category: Option<String>,
    pub region: String,
    pub limit: usize,
}

impl Default for TrendingVideosQuery {
    fn default() -> Self {
        Self {
            category: None,
            region: DEFAULT_REGION.to_string(),
            limit: 20,
        }
    }
}

impl TrendingVideosQuery {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Search string sent upstream.
    pub fn search_text(&self) -> String {
        let region = self.region.trim();
        match self.category() {
            Some(category) => format!("trending {} videos {}", category, region),
            None => format!("trending videos {}", region),
        }
    }
}

impl Query for TrendingVideosQuery {
    type Output = VideoListing;
    const SCHEMA: &'static str = "youtube:trending";
    const TTL_HOURS: u32 = CacheTtl::YOUTUBE_HOURS;

    fn cache_key(&self) -> String {
        format!(
            "youtube:trending:{}:{}:{}",
            self.category().map(key_text).unwrap_or_else(|| "all".to_string()),
            key_text(&self.region),
            self.limit
        )
    }

    fn validate(&self) -> Result<()> {
        require_limit("limit", self.limit)
    }
}
