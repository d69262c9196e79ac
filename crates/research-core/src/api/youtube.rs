//! YouTube methods on ResearchApi.

use crate::error::Result;
use crate::models::{Cached, VideoListing};
use crate::query::{ChannelQuery, TrendingVideosQuery, VideoSearchQuery};
use crate::sources::Fetch;
use crate::ResearchApi;

impl ResearchApi {
    // ========================================
    // YouTube Methods
    // ========================================

    /// Videos matching a free-text query, in rank order.
    pub async fn youtube_search(
        &self,
        query: &VideoSearchQuery,
        no_cache: bool,
    ) -> Result<Cached<VideoListing>> {
        self.read_through(query, no_cache, || self.youtube.fetch(query))
            .await
    }

    /// Recent videos from one channel.
    ///
    /// Falls back to every search hit when no result names the channel.
    pub async fn youtube_channel(
        &self,
        query: &ChannelQuery,
        no_cache: bool,
    ) -> Result<Cached<VideoListing>> {
        self.read_through(query, no_cache, || self.youtube.fetch(query))
            .await
    }

    /// Trending videos for a region, optionally narrowed to a category.
    pub async fn youtube_trending(
        &self,
        query: &TrendingVideosQuery,
        no_cache: bool,
    ) -> Result<Cached<VideoListing>> {
        self.read_through(query, no_cache, || self.youtube.fetch(query))
            .await
    }
}
