//! Reddit subreddit listing adapter.

use super::fields;
use super::{build_client, send_json, Fetch, Pacing};
use crate::config::{NetworkConfig, SourceConfig};
use crate::error::Result;
use crate::models::{RedditListing, RedditPeriod, RedditPost, RedditSort};
use crate::query::{normalize_list, RedditQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

const SERVICE: &str = "reddit";

/// Client for Reddit's public `.json` listings. No authentication.
pub struct RedditSource {
    client: Client,
    base_url: String,
    pacing: Pacing,
}

/// One page of a listing plus the cursor for the next.
struct ListingPage {
    posts: Vec<RedditPost>,
    after: Option<String>,
}

impl RedditSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client(SourceConfig::REDDIT_USER_AGENT)?,
            base_url: SourceConfig::REDDIT_BASE.to_string(),
            pacing: Pacing::new(
                NetworkConfig::PAGE_DELAY,
                SourceConfig::REDDIT_SUBREDDIT_DELAY,
            ),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Posts from every subreddit, merged by id, highest score first.
    pub async fn fetch_posts<S: AsRef<str>>(
        &self,
        subreddits: &[S],
        sort: RedditSort,
        period: RedditPeriod,
        limit: usize,
    ) -> Result<Vec<RedditPost>> {
        let subreddits = normalize_list(subreddits);
        let mut seen: HashSet<String> = HashSet::new();
        let mut posts: Vec<RedditPost> = Vec::new();

        for (index, subreddit) in subreddits.iter().enumerate() {
            if index > 0 {
                self.pacing.between_sequences().await;
            }

            for post in self.fetch_subreddit(subreddit, sort, period, limit).await? {
                if seen.insert(post.id.clone()) {
                    posts.push(post);
                }
            }
        }

        posts.sort_by(|a, b| b.score.cmp(&a.score));
        posts.truncate(limit);

        info!(
            "Fetched {} Reddit posts from {:?} ({}/{})",
            posts.len(),
            subreddits,
            sort,
            period
        );
        Ok(posts)
    }

    async fn fetch_subreddit(
        &self,
        subreddit: &str,
        sort: RedditSort,
        period: RedditPeriod,
        limit: usize,
    ) -> Result<Vec<RedditPost>> {
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let wanted = (limit - posts.len()).min(SourceConfig::REDDIT_MAX_PER_PAGE);

            let page = match self
                .fetch_page(subreddit, sort, period, wanted, after.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) if e.is_transient() => {
                    warn!(
                        "Reddit r/{} page failed, keeping {} posts: {}",
                        subreddit,
                        posts.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let page_len = page.posts.len();
            posts.extend(page.posts.into_iter().take(wanted));

            match page.after {
                Some(cursor) if page_len >= wanted => after = Some(cursor),
                _ => break,
            }

            self.pacing.between_pages().await;
        }

        Ok(posts)
    }

    async fn fetch_page(
        &self,
        subreddit: &str,
        sort: RedditSort,
        period: RedditPeriod,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingPage> {
        let url = format!(
            "{}/r/{}/{}.json",
            self.base_url,
            urlencoding::encode(subreddit),
            sort
        );

        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if sort.uses_period() {
            params.push(("t", period.to_string()));
        }
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }

        debug!("GET {} limit={} after={:?}", url, limit, after);
        let body = send_json(SERVICE, self.client.get(&url).query(&params)).await?;

        let data = body.get("data").unwrap_or(&Value::Null);
        let posts = fields::array(data, "children")
            .iter()
            .map(|child| parse_post(child.get("data").unwrap_or(&Value::Null)))
            .collect();
        let after = fields::str_field(data, "after")
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ListingPage { posts, after })
    }
}

#[async_trait]
impl Fetch<RedditQuery> for RedditSource {
    async fn fetch(&self, query: &RedditQuery) -> Result<RedditListing> {
        let posts = self
            .fetch_posts(&query.subreddits, query.sort, query.period, query.limit)
            .await?;

        Ok(RedditListing {
            subreddits: normalize_list(&query.subreddits),
            sort: query.sort,
            period: query.period,
            count: posts.len(),
            posts,
        })
    }
}

/// Parse the `data` object of one listing child.
pub(crate) fn parse_post(post: &Value) -> RedditPost {
    let permalink = format!(
        "{}{}",
        SourceConfig::REDDIT_PERMALINK_BASE,
        fields::str_field(post, "permalink").unwrap_or("")
    );

    RedditPost {
        id: fields::string_or(post, "id", ""),
        title: fields::string_or(post, "title", ""),
        url: fields::string_or(post, "url", ""),
        permalink,
        author: fields::string_or(post, "author", "[deleted]"),
        subreddit: fields::string_or(post, "subreddit", ""),
        score: fields::int_or_zero(post, "score"),
        upvote_ratio: fields::float_or_zero(post, "upvote_ratio"),
        comments: fields::int_or_zero(post, "num_comments"),
        created_at: fields::unix_seconds(post, "created_utc").unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        flair: fields::opt_string(post, "link_flair_text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_post() {
        let post = json!({
            "id": "1abc",
            "title": "Show: a tiny HTTP server",
            "url": "https://example.com/server",
            "permalink": "/r/rust/comments/1abc/show/",
            "author": "ferris",
            "subreddit": "rust",
            "score": 321,
            "upvote_ratio": 0.97,
            "num_comments": 45,
            "created_utc": 1_700_000_000.0,
            "link_flair_text": "project"
        });

        let parsed = parse_post(&post);
        assert_eq!(parsed.id, "1abc");
        assert_eq!(parsed.permalink, "https://reddit.com/r/rust/comments/1abc/show/");
        assert_eq!(parsed.score, 321);
        assert_eq!(parsed.comments, 45);
        assert_eq!(parsed.created_at.timestamp(), 1_700_000_000);
        assert_eq!(parsed.flair.as_deref(), Some("project"));
    }

    #[test]
    fn test_parse_deleted_post() {
        let parsed = parse_post(&json!({"id": "x", "link_flair_text": null}));
        assert_eq!(parsed.author, "[deleted]");
        assert_eq!(parsed.score, 0);
        assert_eq!(parsed.upvote_ratio, 0.0);
        assert!(parsed.flair.is_none());
        assert_eq!(parsed.permalink, "https://reddit.com");
    }
}
