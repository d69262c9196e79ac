//! YouTube video search through Serper's `/videos` endpoint.

use super::fields;
use super::{Fetch, Pacing, SerperClient};
use crate::config::{NetworkConfig, SourceConfig};
use crate::error::Result;
use crate::models::{VideoListing, VideoResult};
use crate::query::{ChannelQuery, TrendingVideosQuery, VideoSearchQuery};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct YouTubeSource {
    client: SerperClient,
    pacing: Pacing,
}

impl YouTubeSource {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: SerperClient::new(api_key)?,
            pacing: Pacing::new(NetworkConfig::PAGE_DELAY, std::time::Duration::ZERO),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Up to `limit` unique videos for `query`, in rank order.
    ///
    /// Pages of `min(limit, 100)` until `limit` is reached or a page comes
    /// back short. Videos are deduplicated by link and renumbered 1..n in the
    /// merged order. A failed first page is an error; a failed later page
    /// keeps what was already collected.
    pub async fn search_videos(
        &self,
        query: &str,
        limit: usize,
        region: &str,
    ) -> Result<Vec<VideoResult>> {
        let query = query.trim();
        let region = region.trim().to_lowercase();
        let mut seen: HashSet<String> = HashSet::new();
        let mut videos: Vec<VideoResult> = Vec::new();
        // Serper pages by offset, so the page size stays fixed across requests.
        let num = limit.min(SourceConfig::SERPER_MAX_PER_PAGE);
        let mut page = 1usize;

        while videos.len() < limit {
            let body = json!({
                "q": query,
                "num": num,
                "gl": region,
                "page": page,
            });

            debug!("Video search '{}' page {} (num={})", query, page, num);
            let data = if page == 1 {
                self.client.post("videos", &body).await?
            } else {
                match self.client.post_or_degrade("videos", &body).await? {
                    Some(data) => data,
                    None => break,
                }
            };

            let items = fields::array(&data, "videos");
            for item in items {
                if videos.len() >= limit {
                    break;
                }
                let video = parse_video(item);
                if seen.insert(video.link.clone()) {
                    videos.push(video);
                }
            }

            if items.len() < num {
                break;
            }

            page += 1;
            self.pacing.between_pages().await;
        }

        for (index, video) in videos.iter_mut().enumerate() {
            video.position = index as u32 + 1;
        }

        info!("Video search '{}' returned {} videos", query, videos.len());
        Ok(videos)
    }
}

#[async_trait]
impl Fetch<VideoSearchQuery> for YouTubeSource {
    async fn fetch(&self, query: &VideoSearchQuery) -> Result<VideoListing> {
        let videos = self
            .search_videos(&query.query, query.limit, &query.region)
            .await?;
        Ok(listing(query.query.trim(), videos))
    }
}

#[async_trait]
impl Fetch<ChannelQuery> for YouTubeSource {
    async fn fetch(&self, query: &ChannelQuery) -> Result<VideoListing> {
        let videos = self
            .search_videos(&query.search_text(), query.limit, &query.region)
            .await?;
        let channel = query.channel.trim();
        Ok(listing(channel, filter_by_channel(videos, channel)))
    }
}

#[async_trait]
impl Fetch<TrendingVideosQuery> for YouTubeSource {
    async fn fetch(&self, query: &TrendingVideosQuery) -> Result<VideoListing> {
        let text = query.search_text();
        let videos = self.search_videos(&text, query.limit, &query.region).await?;
        Ok(listing(&text, videos))
    }
}

fn listing(query: &str, videos: Vec<VideoResult>) -> VideoListing {
    VideoListing {
        query: query.to_string(),
        count: videos.len(),
        videos,
    }
}

/// Keep videos whose channel name contains `channel`, ignoring case.
///
/// Site-restricted searches often surface other channels; if none match,
/// every video is kept.
pub(crate) fn filter_by_channel(videos: Vec<VideoResult>, channel: &str) -> Vec<VideoResult> {
    let needle = channel.to_lowercase();
    let matching: Vec<VideoResult> = videos
        .iter()
        .filter(|v| {
            v.channel
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    if matching.is_empty() {
        videos
    } else {
        matching
    }
}

pub(crate) fn parse_video(item: &Value) -> VideoResult {
    VideoResult {
        position: fields::position(item, "position").unwrap_or(0),
        title: fields::string_or(item, "title", ""),
        link: fields::string_or(item, "link", ""),
        snippet: fields::string_or(item, "snippet", ""),
        channel: fields::opt_string(item, "channel"),
        duration: fields::opt_string(item, "duration"),
        views: fields::opt_string(item, "views"),
        date: fields::opt_string(item, "date"),
    }
}
