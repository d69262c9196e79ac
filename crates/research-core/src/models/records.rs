//! Records parsed from one upstream item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dev.to article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub reactions: i64,
    pub comments: i64,
    /// Estimated reading time in minutes.
    pub reading_time: i64,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Whether the article carries `tag` (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// A Reddit post from a subreddit listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    /// Link target; equals the permalink for self posts.
    pub url: String,
    /// Absolute discussion URL.
    pub permalink: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub comments: i64,
    pub created_at: DateTime<Utc>,
    pub flair: Option<String>,
}

/// A video search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoResult {
    /// 1-based rank in the merged result list.
    pub position: u32,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub channel: Option<String>,
    pub duration: Option<String>,
    pub views: Option<String>,
    pub date: Option<String>,
}

/// One organic Google result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicResult {
    pub position: u32,
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// A "People Also Ask" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleAlsoAsk {
    pub question: String,
    pub snippet: String,
    pub link: String,
}
