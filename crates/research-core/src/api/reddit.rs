//! Reddit methods on ResearchApi.

use crate::error::Result;
use crate::models::{Cached, RedditListing};
use crate::query::RedditQuery;
use crate::sources::Fetch;
use crate::ResearchApi;

impl ResearchApi {
    /// Posts from the given subreddits, highest score first.
    pub async fn reddit_posts(
        &self,
        query: &RedditQuery,
        no_cache: bool,
    ) -> Result<Cached<RedditListing>> {
        self.read_through(query, no_cache, || self.reddit.fetch(query))
            .await
    }
}
