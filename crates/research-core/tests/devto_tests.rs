//! Integration tests for dev.to queries against a fake articles API.

mod common;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::Recorder;
use research_core::{
    DevToAuthorsQuery, DevToTagsQuery, DevToTrendingQuery, ResearchEnv, ResearchError,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Clone)]
struct DevToState {
    recorder: Recorder,
    /// Articles per tag; the empty tag is the unfiltered listing.
    listings: Arc<HashMap<String, Vec<Value>>>,
}

fn article(id: i64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "title": format!("Article {}", id),
        "url": format!("https://dev.to/a/{}", id),
        "user": {"username": format!("author{}", id % 5)},
        "public_reactions_count": (id * 37) % 101,
        "comments_count": id % 7,
        "reading_time_minutes": 3 + id % 4,
        "tag_list": tags,
        "published_at": "2024-06-01T10:00:00Z"
    })
}

fn listings() -> HashMap<String, Vec<Value>> {
    let typescript = (1..=30)
        .map(|id| {
            if id > 20 {
                article(id, &["typescript", "webdev"])
            } else {
                article(id, &["typescript"])
            }
        })
        .collect();
    let webdev = (21..=45)
        .map(|id| {
            if id <= 30 {
                article(id, &["typescript", "webdev"])
            } else {
                article(id, &["webdev"])
            }
        })
        .collect();
    let all = (1000..1250).map(|id| article(id, &["general"])).collect();

    let mut map = HashMap::new();
    map.insert("typescript".to_string(), typescript);
    map.insert("webdev".to_string(), webdev);
    map.insert(String::new(), all);
    map
}

async fn articles(
    State(state): State<DevToState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let tag = params.get("tag").cloned().unwrap_or_default();
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(30);
    let top = params.get("top").cloned().unwrap_or_default();
    let key = headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    state.recorder.record(format!(
        "tag={} page={} per_page={} top={} key={}",
        tag, page, per_page, top, key
    ));

    match tag.as_str() {
        "broken" => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "locked" => return StatusCode::UNAUTHORIZED.into_response(),
        _ => {}
    }

    let items: Vec<Value> = state
        .listings
        .get(&tag)
        .map(|list| {
            list.iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Json(Value::Array(items)).into_response()
}

async fn fake_devto() -> (String, Recorder) {
    let recorder = Recorder::default();
    let state = DevToState {
        recorder: recorder.clone(),
        listings: Arc::new(listings()),
    };
    let router = Router::new()
        .route("/articles", get(articles))
        .with_state(state);
    (common::serve(router).await, recorder)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_trending_by_tags_is_unique_tagged_and_sorted() {
    let (url, recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTrendingQuery {
        tags: strings(&["typescript", "webdev"]),
        period: 7,
        limit: 20,
    };
    let result = api.devto_trending(&query, false).await.unwrap();

    assert!(!result.cached);
    assert!(result.count <= 20);
    assert_eq!(result.count, result.articles.len());

    let ids: HashSet<i64> = result.articles.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), result.articles.len(), "article ids must be unique");

    for article in &result.articles {
        assert!(article.has_tag("typescript") || article.has_tag("webdev"));
    }
    for pair in result.articles.windows(2) {
        assert!(pair[0].reactions >= pair[1].reactions);
    }

    // The first tag alone fills the limit, so the second is never requested.
    let requests = recorder.requests();
    assert_eq!(requests, vec!["tag=typescript page=1 per_page=20 top=7 key=-"]);
}

#[tokio::test]
async fn test_trending_fan_out_deduplicates_overlap() {
    let (url, recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTrendingQuery {
        tags: strings(&["typescript", "webdev"]),
        period: 7,
        limit: 50,
    };
    let result = api.devto_trending(&query, false).await.unwrap();

    // 30 typescript + 25 webdev, of which 10 carry both tags.
    assert_eq!(result.count, 45);
    let ids: HashSet<i64> = result.articles.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), 45);
    assert_eq!(recorder.hits(), 2);
    assert_eq!(result.tags, strings(&["typescript", "webdev"]));
}

#[tokio::test]
async fn test_unfiltered_listing_paginates_to_limit() {
    let (url, recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTrendingQuery {
        tags: vec![],
        period: 30,
        limit: 120,
    };
    let result = api.devto_trending(&query, false).await.unwrap();

    assert_eq!(result.count, 120);
    assert!(result.tags.is_empty());
    assert_eq!(
        recorder.requests(),
        vec![
            "tag= page=1 per_page=100 top=30 key=-",
            "tag= page=2 per_page=100 top=30 key=-",
        ]
    );
}

#[tokio::test]
async fn test_failed_tag_degrades_to_partial_results() {
    let (url, _recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTrendingQuery {
        tags: strings(&["broken", "typescript"]),
        period: 7,
        limit: 50,
    };
    let result = api.devto_trending(&query, false).await.unwrap();

    assert_eq!(result.count, 30);
    assert!(result.articles.iter().all(|a| a.has_tag("typescript")));
}

#[tokio::test]
async fn test_unauthorized_is_fatal_and_not_cached() {
    let (url, _recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTrendingQuery {
        tags: strings(&["typescript", "locked"]),
        period: 7,
        limit: 100,
    };
    let err = api.devto_trending(&query, false).await.unwrap_err();

    assert!(matches!(err, ResearchError::Auth { ref service, .. } if service == "devto"));
    assert_eq!(api.cache_stats().unwrap().total_entries, 0);
}

#[tokio::test]
async fn test_api_key_header_sent_when_configured() {
    let (url, recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let env = ResearchEnv {
        devto_api_key: Some("dev-secret".into()),
        ..common::test_env()
    };
    let api = common::builder_with_env(&temp, env)
        .devto_base_url(&url)
        .build()
        .unwrap();

    api.devto_trending(&DevToTrendingQuery::default(), false)
        .await
        .unwrap();

    assert!(recorder.requests()[0].ends_with("key=dev-secret"));
}

#[tokio::test]
async fn test_second_call_is_served_from_cache() {
    let (url, recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTrendingQuery {
        tags: strings(&["webdev"]),
        ..Default::default()
    };
    let first = api.devto_trending(&query, false).await.unwrap();
    let hits_after_first = recorder.hits();

    let reordered = DevToTrendingQuery {
        tags: strings(&[" WebDev "]),
        ..Default::default()
    };
    let second = api.devto_trending(&reordered, false).await.unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.data, second.data);
    assert_eq!(recorder.hits(), hits_after_first);
}

#[tokio::test]
async fn test_tag_report_skips_empty_tags() {
    let (url, _recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToTagsQuery {
        tags: strings(&["typescript", "webdev", "nothing"]),
        period: 7,
        limit: 10,
    };
    let report = api.devto_tags(&query, false).await.unwrap();

    assert_eq!(report.sample_size, 45);
    assert_eq!(report.tags.len(), 2);

    let by_name: HashMap<&str, _> = report.tags.iter().map(|t| (t.name.as_str(), t)).collect();
    assert_eq!(by_name["typescript"].article_count, 30);
    assert_eq!(by_name["webdev"].article_count, 25);

    for stats in &report.tags {
        let mean = stats.total_reactions as f64 / stats.article_count as f64;
        assert_eq!(stats.avg_reactions, mean);
    }
    assert!(report.tags[0].avg_reactions >= report.tags[1].avg_reactions);
}

#[tokio::test]
async fn test_tag_report_requires_tags() {
    let (url, recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let err = api
        .devto_tags(&DevToTagsQuery::default(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ResearchError::Validation { ref field, .. } if field == "tags"));
    assert_eq!(recorder.hits(), 0);
}

#[tokio::test]
async fn test_author_report() {
    let (url, _recorder) = fake_devto().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).devto_base_url(&url).build().unwrap();

    let query = DevToAuthorsQuery {
        tags: strings(&["typescript"]),
        period: 7,
        limit: 3,
    };
    let report = api.devto_authors(&query, false).await.unwrap();

    assert_eq!(report.sample_size, 30);
    assert_eq!(report.authors.len(), 3);
    for pair in report.authors.windows(2) {
        assert!(pair[0].total_reactions >= pair[1].total_reactions);
    }

    // Per-author article lists are not part of the cached payload.
    let cached = api.devto_authors(&query, false).await.unwrap();
    assert!(cached.cached);
    assert!(cached.authors.iter().all(|a| a.articles.is_empty()));
    assert_eq!(cached.authors[0].username, report.authors[0].username);
}
