//! Per-key aggregates derived from a batch of articles.

use super::records::Article;
use serde::{Deserialize, Serialize};

/// Engagement summary for one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagStats {
    pub name: String,
    pub article_count: usize,
    pub total_reactions: i64,
    pub total_comments: i64,
    pub avg_reactions: f64,
    pub avg_comments: f64,
    pub avg_reading_time: f64,
}

/// Engagement summary for one author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorStats {
    pub username: String,
    pub article_count: usize,
    pub total_reactions: i64,
    pub total_comments: i64,
    pub avg_reactions: f64,
    /// The author's articles in the sample. Not cached.
    #[serde(skip)]
    pub articles: Vec<Article>,
}
