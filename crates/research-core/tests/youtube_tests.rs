//! Integration tests for YouTube queries against a fake Serper `/videos` API.

mod common;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use common::Recorder;
use research_core::{ChannelQuery, ResearchError, TrendingVideosQuery, VideoSearchQuery};
use serde_json::{json, Value};
use std::collections::HashSet;
use tempfile::TempDir;

fn video(index: usize, channel: &str) -> Value {
    json!({
        "title": format!("Video {}", index),
        "link": format!("https://www.youtube.com/watch?v=v{}", index),
        "snippet": "...",
        "channel": channel,
        "duration": "10:00",
        "date": "2 days ago",
        "position": index + 1
    })
}

fn results_for(q: &str) -> Vec<Value> {
    if q == "rust tutorial" {
        // Entry 50 repeats entry 10's link.
        return (0..130)
            .map(|i| if i == 50 { video(10, "Dup") } else { video(i, "Tutor") })
            .collect();
    }
    if q.starts_with('"') {
        return vec![
            video(1, "Fireship"),
            video(2, "Some Other Channel"),
            video(3, "fireship clips"),
            video(4, "Unrelated"),
            video(5, "Unrelated"),
        ];
    }
    if q == "half broken" {
        return (0..150).map(|i| video(i, "Partial")).collect();
    }
    if q.starts_with("trending") {
        return (0..3).map(|i| video(i, "Trends")).collect();
    }
    Vec::new()
}

async fn videos(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    recorder.record(body.to_string());

    let q = body["q"].as_str().unwrap_or_default();
    if q == "broken" {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let num = body["num"].as_u64().unwrap_or(10) as usize;
    let page = body["page"].as_u64().unwrap_or(1) as usize;
    if q == "half broken" && page > 1 {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    let items: Vec<Value> = results_for(q)
        .into_iter()
        .skip((page - 1) * num)
        .take(num)
        .collect();

    Json(json!({"searchParameters": {"q": q}, "videos": items})).into_response()
}

async fn fake_videos() -> (String, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new()
        .route("/videos", post(videos))
        .with_state(recorder.clone());
    (common::serve(router).await, recorder)
}

fn bodies(recorder: &Recorder) -> Vec<Value> {
    recorder
        .requests()
        .iter()
        .map(|r| serde_json::from_str(r).unwrap())
        .collect()
}

#[tokio::test]
async fn test_search_paginates_and_dedups_by_link() {
    let (url, recorder) = fake_videos().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).serper_base_url(&url).build().unwrap();

    let query = VideoSearchQuery {
        query: "rust tutorial".into(),
        limit: 120,
        ..Default::default()
    };
    let result = api.youtube_search(&query, false).await.unwrap();

    assert_eq!(result.count, 120);
    let links: HashSet<&str> = result.videos.iter().map(|v| v.link.as_str()).collect();
    assert_eq!(links.len(), 120);

    let positions: Vec<u32> = result.videos.iter().map(|v| v.position).collect();
    assert_eq!(positions, (1..=120).collect::<Vec<u32>>());

    let sent = bodies(&recorder);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], json!({"q": "rust tutorial", "num": 100, "gl": "us", "page": 1}));
    assert_eq!(sent[1]["page"], 2);
    assert_eq!(sent[1]["num"], 100);
}

#[tokio::test]
async fn test_channel_filter_and_listing_query() {
    let (url, recorder) = fake_videos().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).serper_base_url(&url).build().unwrap();

    let query = ChannelQuery {
        channel: "Fireship".into(),
        ..Default::default()
    };
    let result = api.youtube_channel(&query, false).await.unwrap();

    assert_eq!(result.query, "Fireship");
    assert_eq!(result.count, 2);
    assert!(result
        .videos
        .iter()
        .all(|v| v.channel.as_deref().unwrap().to_lowercase().contains("fireship")));
    assert_eq!(bodies(&recorder)[0]["q"], "\"Fireship\" site:youtube.com");
}

#[tokio::test]
async fn test_channel_without_matches_keeps_everything() {
    let (url, _recorder) = fake_videos().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).serper_base_url(&url).build().unwrap();

    let query = ChannelQuery {
        channel: "Nobody".into(),
        ..Default::default()
    };
    let result = api.youtube_channel(&query, false).await.unwrap();
    assert_eq!(result.count, 5);
}

#[tokio::test]
async fn test_trending_query_text_and_ttl() {
    let (url, recorder) = fake_videos().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).serper_base_url(&url).build().unwrap();

    let query = TrendingVideosQuery {
        category: Some("gaming".into()),
        region: "gb".into(),
        limit: 10,
    };
    let result = api.youtube_trending(&query, false).await.unwrap();

    assert_eq!(result.query, "trending gaming videos gb");
    assert_eq!(result.count, 3);

    let sent = bodies(&recorder);
    assert_eq!(sent[0]["q"], "trending gaming videos gb");
    assert_eq!(sent[0]["gl"], "gb");

    let entry = api
        .cache()
        .get_entry("youtube:trending:gaming:gb:10")
        .unwrap()
        .unwrap();
    assert_eq!((entry.expires_at - entry.cached_at).num_hours(), 24);
}

#[tokio::test]
async fn test_failed_first_page_is_an_error_and_not_cached() {
    let (url, recorder) = fake_videos().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).serper_base_url(&url).build().unwrap();

    let query = VideoSearchQuery {
        query: "broken".into(),
        ..Default::default()
    };
    for _ in 0..2 {
        let err = api.youtube_search(&query, false).await.unwrap_err();
        assert!(matches!(err, ResearchError::ApiStatus { status: 503, .. }));
    }

    assert_eq!(recorder.hits(), 2);
    assert_eq!(api.cache_stats().unwrap().total_entries, 0);
}

#[tokio::test]
async fn test_failed_later_page_keeps_first_page() {
    let (url, recorder) = fake_videos().await;
    let temp = TempDir::new().unwrap();
    let api = common::builder(&temp).serper_base_url(&url).build().unwrap();

    let query = VideoSearchQuery {
        query: "half broken".into(),
        limit: 150,
        ..Default::default()
    };
    let result = api.youtube_search(&query, false).await.unwrap();

    assert_eq!(result.count, 100);
    assert_eq!(recorder.hits(), 2);
}
