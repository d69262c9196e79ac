//! Serper.dev Google SERP adapter.

use super::fields;
use super::{build_client, send_json, Fetch};
use crate::config::{NetworkConfig, ResearchEnv, SourceConfig};
use crate::error::{ResearchError, Result};
use crate::models::{
    KeywordSuggestions, OrganicResult, PeopleAlsoAsk, PeopleAlsoAskList, RelatedSearches,
    SerpAnalysis,
};
use crate::query::{KeywordsQuery, PaaQuery, RelatedQuery, SerpQuery};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const SERVICE: &str = "serper";

/// Organic results requested for PAA and related-search lookups.
const SUPPORT_SEARCH_NUM: usize = 10;

/// Authenticated JSON client for the Serper API.
///
/// The key is checked lazily: a missing key only fails a request that would
/// actually go out.
pub struct SerperClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SerperClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(NetworkConfig::USER_AGENT)?,
            base_url: SourceConfig::SERPER_API_BASE.to_string(),
            api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// POST a JSON body to `path` and decode the response.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ResearchError::MissingCredential {
                name: ResearchEnv::SERPER_API_KEY_VAR.to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("POST {}", url);

        let request = self.client.post(&url).header("X-API-KEY", key).json(body);
        send_json(SERVICE, request).await
    }

    /// Like [`post`](Self::post), but a transient failure yields `None`.
    ///
    /// Only for follow-up pages; a first request must fail loudly so an empty
    /// answer is never cached.
    pub async fn post_or_degrade(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        match self.post(path, body).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_transient() => {
                warn!("Serper /{} failed, keeping earlier pages: {}", path, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Google search and autocomplete through Serper.
pub struct SerperSource {
    client: SerperClient,
}

impl SerperSource {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: SerperClient::new(api_key)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    /// Run one web search. Any failure is returned, never an empty analysis.
    pub async fn search(&self, query: &str, num: usize, gl: &str) -> Result<SerpAnalysis> {
        let query = query.trim();
        let body = json!({
            "q": query,
            "num": num.min(SourceConfig::SERPER_MAX_PER_PAGE),
            "gl": gl.trim().to_lowercase(),
            "hl": SourceConfig::SERPER_LANGUAGE,
        });

        let data = self.client.post("search", &body).await?;
        let analysis = parse_search(query, &data);

        info!(
            "Serper search '{}': {} organic, {} PAA, {} related",
            query,
            analysis.results.len(),
            analysis.people_also_ask.len(),
            analysis.related_searches.len()
        );
        Ok(analysis)
    }

    /// Autocomplete suggestions for a seed keyword.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<String>> {
        let body = json!({ "q": query.trim() });
        let data = self.client.post("autocomplete", &body).await?;
        Ok(parse_suggestions(&data))
    }
}

#[async_trait]
impl Fetch<KeywordsQuery> for SerperSource {
    async fn fetch(&self, query: &KeywordsQuery) -> Result<KeywordSuggestions> {
        let suggestions = self.autocomplete(&query.query).await?;
        Ok(KeywordSuggestions {
            query: query.query.trim().to_string(),
            suggestions,
        })
    }
}

#[async_trait]
impl Fetch<SerpQuery> for SerperSource {
    async fn fetch(&self, query: &SerpQuery) -> Result<SerpAnalysis> {
        self.search(&query.query, query.num, &query.gl).await
    }
}

#[async_trait]
impl Fetch<PaaQuery> for SerperSource {
    async fn fetch(&self, query: &PaaQuery) -> Result<PeopleAlsoAskList> {
        let analysis = self
            .search(&query.query, SUPPORT_SEARCH_NUM, &query.gl)
            .await?;
        Ok(PeopleAlsoAskList {
            query: analysis.query,
            questions: analysis.people_also_ask,
        })
    }
}

#[async_trait]
impl Fetch<RelatedQuery> for SerperSource {
    async fn fetch(&self, query: &RelatedQuery) -> Result<RelatedSearches> {
        let analysis = self
            .search(&query.query, SUPPORT_SEARCH_NUM, &query.gl)
            .await?;
        Ok(RelatedSearches {
            query: analysis.query,
            related_searches: analysis.related_searches,
        })
    }
}

pub(crate) fn parse_search(query: &str, data: &Value) -> SerpAnalysis {
    let results = fields::array(data, "organic")
        .iter()
        .enumerate()
        .map(|(i, item)| OrganicResult {
            position: fields::position(item, "position").unwrap_or(i as u32 + 1),
            title: fields::string_or(item, "title", ""),
            link: fields::string_or(item, "link", ""),
            snippet: fields::string_or(item, "snippet", ""),
        })
        .collect();

    let people_also_ask = fields::array(data, "peopleAlsoAsk")
        .iter()
        .map(|item| PeopleAlsoAsk {
            question: fields::string_or(item, "question", ""),
            snippet: fields::string_or(item, "snippet", ""),
            link: fields::string_or(item, "link", ""),
        })
        .collect();

    let related_searches = fields::array(data, "relatedSearches")
        .iter()
        .filter_map(|item| fields::str_field(item, "query"))
        .filter(|q| !q.trim().is_empty())
        .map(str::to_string)
        .collect();

    SerpAnalysis {
        query: query.to_string(),
        results,
        people_also_ask,
        related_searches,
    }
}

/// Suggestions arrive as plain strings or `{"value": ...}` objects.
pub(crate) fn parse_suggestions(data: &Value) -> Vec<String> {
    fields::array(data, "suggestions")
        .iter()
        .filter_map(|s| match s {
            Value::String(text) => Some(text.clone()),
            Value::Object(_) => fields::str_field(s, "value").map(str::to_string),
            _ => None,
        })
        .filter(|s| !s.trim().is_empty())
        .collect()
}
