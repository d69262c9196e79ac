//! dev.to article adapter.

use super::fields;
use super::{build_client, send_json, Fetch, Pacing};
use crate::config::{NetworkConfig, SourceConfig};
use crate::error::Result;
use crate::models::{Article, TrendingArticles};
use crate::query::{normalize_list, DevToTrendingQuery};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

const SERVICE: &str = "devto";

/// Client for the dev.to public articles API.
pub struct DevToSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    pacing: Pacing,
}

impl DevToSource {
    /// Create an adapter. The API key is optional for public listings.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(NetworkConfig::USER_AGENT)?,
            base_url: SourceConfig::DEVTO_API_BASE.to_string(),
            api_key,
            pacing: Pacing::new(NetworkConfig::PAGE_DELAY, SourceConfig::DEVTO_TAG_DELAY),
        })
    }

    /// Point the adapter at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Top articles for the last `period` days, most reactions first.
    ///
    /// With tags, fetches each tag in order and merges by article id, stopping
    /// once `limit` unique articles are collected. Without tags, fetches the
    /// unfiltered listing.
    pub async fn fetch_articles<S: AsRef<str>>(
        &self,
        tags: &[S],
        period: u32,
        limit: usize,
    ) -> Result<Vec<Article>> {
        let tags = normalize_list(tags);
        let mut seen: HashSet<i64> = HashSet::new();
        let mut articles: Vec<Article> = Vec::new();

        if tags.is_empty() {
            for article in self.fetch_for_tag(None, period, limit).await? {
                if seen.insert(article.id) {
                    articles.push(article);
                }
            }
        } else {
            for (index, tag) in tags.iter().enumerate() {
                if index > 0 {
                    self.pacing.between_sequences().await;
                }

                for article in self.fetch_for_tag(Some(tag), period, limit).await? {
                    if articles.len() >= limit {
                        break;
                    }
                    if seen.insert(article.id) {
                        articles.push(article);
                    }
                }

                if articles.len() >= limit {
                    debug!("Collected {} articles after tag '{}'", articles.len(), tag);
                    break;
                }
            }
        }

        articles.sort_by(|a, b| b.reactions.cmp(&a.reactions));
        articles.truncate(limit);

        info!(
            "Fetched {} dev.to articles (tags: {:?}, period: {}d)",
            articles.len(),
            tags,
            period
        );
        Ok(articles)
    }

    /// Page through one tag (or the unfiltered listing) until `limit`.
    async fn fetch_for_tag(
        &self,
        tag: Option<&str>,
        period: u32,
        limit: usize,
    ) -> Result<Vec<Article>> {
        let per_page = limit.min(SourceConfig::DEVTO_MAX_PER_PAGE);
        let mut articles = Vec::new();
        let mut page = 1usize;

        while articles.len() < limit {
            let items = match self.fetch_page(tag, period, page, per_page).await {
                Ok(items) => items,
                Err(e) if e.is_transient() => {
                    warn!(
                        "dev.to page {} for tag {:?} failed, keeping {} articles: {}",
                        page,
                        tag,
                        articles.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            if items.is_empty() {
                break;
            }

            let page_len = items.len();
            for item in &items {
                if articles.len() >= limit {
                    break;
                }
                articles.push(parse_article(item));
            }

            if page_len < per_page {
                break;
            }

            page += 1;
            self.pacing.between_pages().await;
        }

        Ok(articles)
    }

    async fn fetch_page(
        &self,
        tag: Option<&str>,
        period: u32,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/articles", self.base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("top", period.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(tag) = tag {
            params.push(("tag", tag.to_string()));
        }

        let mut request = self.client.get(&url).query(&params);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        debug!("GET {} page={} tag={:?}", url, page, tag);
        let body = send_json(SERVICE, request).await?;

        Ok(match body {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }
}

#[async_trait]
impl Fetch<DevToTrendingQuery> for DevToSource {
    async fn fetch(&self, query: &DevToTrendingQuery) -> Result<TrendingArticles> {
        let articles = self
            .fetch_articles(&query.tags, query.period, query.limit)
            .await?;

        Ok(TrendingArticles {
            period: query.period,
            tags: normalize_list(&query.tags),
            count: articles.len(),
            articles,
        })
    }
}

/// Parse one article item. Missing fields fall back to defaults.
pub(crate) fn parse_article(item: &Value) -> Article {
    let published_at = fields::rfc3339(item, "published_at")
        .or_else(|| fields::rfc3339(item, "published_timestamp"))
        .unwrap_or_else(Utc::now);

    let author = item
        .get("user")
        .and_then(|user| fields::str_field(user, "username"))
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown")
        .to_string();

    Article {
        id: fields::int_or_zero(item, "id"),
        title: fields::string_or(item, "title", ""),
        url: fields::string_or(item, "url", ""),
        author,
        reactions: fields::int_or_zero(item, "public_reactions_count"),
        comments: fields::int_or_zero(item, "comments_count"),
        reading_time: fields::int_or_zero(item, "reading_time_minutes"),
        tags: fields::string_list(item, "tag_list"),
        published_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_article() {
        let item = json!({
            "id": 101,
            "title": "Understanding Rust lifetimes",
            "url": "https://dev.to/ada/lifetimes",
            "user": {"username": "ada"},
            "public_reactions_count": 250,
            "comments_count": 12,
            "reading_time_minutes": 7,
            "tag_list": ["rust", "beginners"],
            "published_at": "2024-05-01T08:30:00Z"
        });

        let article = parse_article(&item);
        assert_eq!(article.id, 101);
        assert_eq!(article.author, "ada");
        assert_eq!(article.reactions, 250);
        assert_eq!(article.reading_time, 7);
        assert_eq!(article.tags, vec!["rust", "beginners"]);
        assert_eq!(article.published_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn test_parse_sparse_article() {
        let item = json!({
            "id": 7,
            "tag_list": "webdev, css",
            "published_timestamp": "2024-01-02T00:00:00Z",
            "user": {}
        });

        let article = parse_article(&item);
        assert_eq!(article.author, "unknown");
        assert_eq!(article.title, "");
        assert_eq!(article.reactions, 0);
        assert_eq!(article.tags, vec!["webdev", "css"]);
        assert_eq!(article.published_at.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let before = Utc::now();
        let article = parse_article(&json!({"id": 1}));
        assert!(article.published_at >= before);
    }
}
