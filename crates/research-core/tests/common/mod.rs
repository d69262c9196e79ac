//! Shared fixtures for integration tests: fake upstream servers and a
//! preconfigured API builder.

#![allow(dead_code)]

use axum::Router;
use research_core::{Pacing, ResearchApiBuilder, ResearchEnv};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake server error");
    });

    format!("http://{}", addr)
}

/// Request log shared between a fake server and the test body.
#[derive(Clone, Default)]
pub struct Recorder {
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn record(&self, request: impl Into<String>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.into());
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Credentials used by every test unless it is checking their absence.
pub fn test_env() -> ResearchEnv {
    ResearchEnv {
        devto_api_key: None,
        serper_api_key: Some("test-key".to_string()),
        cache_path: None,
    }
}

/// A builder with a temp-dir cache and no pacing delays.
pub fn builder(temp: &TempDir) -> ResearchApiBuilder {
    builder_with_env(temp, test_env())
}

pub fn builder_with_env(temp: &TempDir, env: ResearchEnv) -> ResearchApiBuilder {
    ResearchApiBuilder::new(env)
        .cache_path(temp.path().join("cache.sqlite"))
        .with_pacing(Pacing::none())
}
