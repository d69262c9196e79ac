//! dev.to methods on ResearchApi.

use crate::aggregate;
use crate::error::Result;
use crate::models::{AuthorReport, Cached, TagReport, TrendingArticles};
use crate::query::{
    aggregate_sample_size, normalize_list, DevToAuthorsQuery, DevToTagsQuery,
    DevToTrendingQuery,
};
use crate::sources::Fetch;
use crate::ResearchApi;

impl ResearchApi {
    // ========================================
    // dev.to Methods
    // ========================================

    /// Trending articles, most reactions first.
    pub async fn devto_trending(
        &self,
        query: &DevToTrendingQuery,
        no_cache: bool,
    ) -> Result<Cached<TrendingArticles>> {
        self.read_through(query, no_cache, || self.devto.fetch(query))
            .await
    }

    /// Engagement per tag, computed over a sample of trending articles.
    pub async fn devto_tags(
        &self,
        query: &DevToTagsQuery,
        no_cache: bool,
    ) -> Result<Cached<TagReport>> {
        self.read_through(query, no_cache, || self.build_tag_report(query))
            .await
    }

    /// Authors ranked by total reactions over a sample of trending articles.
    pub async fn devto_authors(
        &self,
        query: &DevToAuthorsQuery,
        no_cache: bool,
    ) -> Result<Cached<AuthorReport>> {
        self.read_through(query, no_cache, || self.build_author_report(query))
            .await
    }

    async fn build_tag_report(&self, query: &DevToTagsQuery) -> Result<TagReport> {
        let tags = normalize_list(&query.tags);
        let sample = self
            .devto
            .fetch_articles(&tags, query.period, aggregate_sample_size(query.limit))
            .await?;

        Ok(TagReport {
            period: query.period,
            sample_size: sample.len(),
            tags: aggregate::group_by_tag(&sample, &tags, query.limit),
        })
    }

    async fn build_author_report(&self, query: &DevToAuthorsQuery) -> Result<AuthorReport> {
        let tags = normalize_list(&query.tags);
        let sample = self
            .devto
            .fetch_articles(&tags, query.period, aggregate_sample_size(query.limit))
            .await?;

        Ok(AuthorReport {
            period: query.period,
            tags,
            sample_size: sample.len(),
            authors: aggregate::group_by_author(&sample, query.limit),
        })
    }
}
