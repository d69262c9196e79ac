//! Google (Serper) methods on ResearchApi.

use crate::error::Result;
use crate::models::{
    Cached, KeywordSuggestions, PeopleAlsoAskList, RelatedSearches, SerpAnalysis,
};
use crate::query::{KeywordsQuery, PaaQuery, RelatedQuery, SerpQuery};
use crate::sources::Fetch;
use crate::ResearchApi;

impl ResearchApi {
    // ========================================
    // Google Methods
    // ========================================

    /// Autocomplete suggestions for a seed keyword.
    ///
    /// Requires `SERPER_API_KEY` unless the answer is already cached.
    pub async fn google_keywords(
        &self,
        query: &KeywordsQuery,
        no_cache: bool,
    ) -> Result<Cached<KeywordSuggestions>> {
        self.read_through(query, no_cache, || self.serper.fetch(query))
            .await
    }

    /// Organic results, "People Also Ask" and related searches.
    pub async fn google_serp(
        &self,
        query: &SerpQuery,
        no_cache: bool,
    ) -> Result<Cached<SerpAnalysis>> {
        self.read_through(query, no_cache, || self.serper.fetch(query))
            .await
    }

    /// "People Also Ask" questions for a query.
    pub async fn google_paa(
        &self,
        query: &PaaQuery,
        no_cache: bool,
    ) -> Result<Cached<PeopleAlsoAskList>> {
        self.read_through(query, no_cache, || self.serper.fetch(query))
            .await
    }

    /// Related searches Google suggests for a query.
    pub async fn google_related(
        &self,
        query: &RelatedQuery,
        no_cache: bool,
    ) -> Result<Cached<RelatedSearches>> {
        self.read_through(query, no_cache, || self.serper.fetch(query))
            .await
    }
}
