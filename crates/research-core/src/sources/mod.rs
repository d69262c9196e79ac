//! Fetch adapters for each upstream service.
//!
//! Each adapter owns its HTTP client for its whole lifetime and turns raw
//! JSON into the record types in [`crate::models`]. Adapters absorb transient
//! failures page by page; authentication and rate-limit failures abort the
//! call.

mod devto;
mod fields;
mod pacing;
mod reddit;
mod serper;
mod youtube;

pub use devto::DevToSource;
pub use pacing::Pacing;
pub use reddit::RedditSource;
pub use serper::{SerperClient, SerperSource};
pub use youtube::YouTubeSource;

use crate::config::NetworkConfig;
use crate::error::{ResearchError, Result};
use crate::query::Query;
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Something that can answer a logical query by calling out to a service.
#[async_trait]
pub trait Fetch<Q: Query>: Send + Sync {
    /// Fetch a fresh result for `query`. Never consults the cache.
    async fn fetch(&self, query: &Q) -> Result<Q::Output>;
}

/// Build the HTTP client an adapter keeps for its lifetime.
pub(crate) fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(NetworkConfig::REQUEST_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .map_err(|e| ResearchError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            cause: None,
        })
}

/// Send a request and decode the JSON body.
///
/// 401 maps to [`ResearchError::Auth`] and 429 to
/// [`ResearchError::RateLimited`]; any other non-success status is an
/// [`ResearchError::ApiStatus`].
pub(crate) async fn send_json(service: &str, request: RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED => {
            return Err(ResearchError::Auth {
                service: service.to_string(),
                message: "Invalid API key".to_string(),
            });
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(ResearchError::RateLimited {
                service: service.to_string(),
                retry_after_secs,
            });
        }
        s if !s.is_success() => {
            return Err(ResearchError::ApiStatus {
                service: service.to_string(),
                status: s.as_u16(),
            });
        }
        _ => {}
    }

    let body = response.json::<Value>().await?;
    debug!("{} responded {}", service, status);
    Ok(body)
}
