//! Result types returned by the orchestration layer.

use super::records::{Article, OrganicResult, PeopleAlsoAsk, RedditPost, VideoResult};
use super::reddit::{RedditPeriod, RedditSort};
use super::stats::{AuthorStats, TagStats};
use serde::{Deserialize, Serialize};

/// A result plus whether it was served from cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cached<T> {
    #[serde(flatten)]
    pub data: T,
    pub cached: bool,
}

impl<T> Cached<T> {
    pub fn hit(data: T) -> Self {
        Self { data, cached: true }
    }

    pub fn fresh(data: T) -> Self {
        Self {
            data,
            cached: false,
        }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> std::ops::Deref for Cached<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Top dev.to articles for a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingArticles {
    /// Window in days.
    pub period: u32,
    /// Tag filter; empty means all tags.
    pub tags: Vec<String>,
    pub count: usize,
    pub articles: Vec<Article>,
}

/// Engagement ranking across requested tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagReport {
    pub period: u32,
    /// Number of articles the stats were computed from.
    pub sample_size: usize,
    pub tags: Vec<TagStats>,
}

/// Authors ranked by total reactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorReport {
    pub period: u32,
    pub tags: Vec<String>,
    pub sample_size: usize,
    pub authors: Vec<AuthorStats>,
}

/// Google autocomplete suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSuggestions {
    pub query: String,
    pub suggestions: Vec<String>,
}

/// Who ranks for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerpAnalysis {
    pub query: String,
    pub results: Vec<OrganicResult>,
    pub people_also_ask: Vec<PeopleAlsoAsk>,
    pub related_searches: Vec<String>,
}

impl SerpAnalysis {
    /// Rank of the first organic result whose link contains `pattern`.
    pub fn find_url_position(&self, pattern: &str) -> Option<u32> {
        self.results
            .iter()
            .find(|r| r.link.contains(pattern))
            .map(|r| r.position)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleAlsoAskList {
    pub query: String,
    pub questions: Vec<PeopleAlsoAsk>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedSearches {
    pub query: String,
    pub related_searches: Vec<String>,
}

/// Posts merged across subreddits, highest score first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditListing {
    pub subreddits: Vec<String>,
    pub sort: RedditSort,
    pub period: RedditPeriod,
    pub count: usize,
    pub posts: Vec<RedditPost>,
}

/// Video search hits in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoListing {
    /// The query as given by the caller (channel name for channel lookups).
    pub query: String,
    pub count: usize,
    pub videos: Vec<VideoResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn organic(position: u32, link: &str) -> OrganicResult {
        OrganicResult {
            position,
            link: link.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_url_position() {
        let serp = SerpAnalysis {
            query: "rust async".into(),
            results: vec![
                organic(1, "https://tokio.rs/tokio/tutorial"),
                organic(2, "https://blog.example.com/async"),
                organic(3, "https://example.com/other"),
            ],
            ..Default::default()
        };

        assert_eq!(serp.find_url_position("example.com"), Some(2));
        assert_eq!(serp.find_url_position("tokio.rs"), Some(1));
        assert_eq!(serp.find_url_position("docs.rs"), None);
    }

    #[test]
    fn test_cached_flattens_into_payload() {
        let wrapped = Cached::hit(KeywordSuggestions {
            query: "rust".into(),
            suggestions: vec!["rust book".into()],
        });

        let value = serde_json::to_value(&wrapped).unwrap();
        assert_eq!(
            value,
            json!({"query": "rust", "suggestions": ["rust book"], "cached": true})
        );
        assert_eq!(wrapped.suggestions.len(), 1);
    }

    #[test]
    fn test_author_articles_not_serialized() {
        let report = AuthorReport {
            period: 7,
            sample_size: 1,
            authors: vec![AuthorStats {
                username: "ada".into(),
                article_count: 1,
                articles: vec![Article::default()],
                ..Default::default()
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&report).unwrap();
        assert!(value["authors"][0].get("articles").is_none());

        let decoded: AuthorReport = serde_json::from_value(value).unwrap();
        assert!(decoded.authors[0].articles.is_empty());
    }

    #[test]
    fn test_listing_decodes_with_missing_fields() {
        let listing: RedditListing =
            serde_json::from_value(json!({"subreddits": ["rust"], "count": 0})).unwrap();
        assert_eq!(listing.sort, RedditSort::Hot);
        assert_eq!(listing.period, RedditPeriod::Week);
        assert!(listing.posts.is_empty());
    }
}
