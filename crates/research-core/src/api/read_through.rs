//! Shared cache-or-fetch path for every query.

use crate::error::{ResearchError, Result};
use crate::models::Cached;
use crate::query::Query;
use crate::ResearchApi;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// On-disk wrapper tagging a payload with the query kind that produced it.
#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema: &'a str,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    schema: String,
    data: Value,
}

pub(crate) fn encode_envelope<T: Serialize>(schema: &str, data: &T) -> Result<Value> {
    Ok(serde_json::to_value(EnvelopeRef { schema, data })?)
}

/// Unwrap a cached payload. `Err` carries why it could not be used.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    schema: &str,
    payload: Value,
) -> std::result::Result<T, String> {
    let envelope: Envelope =
        serde_json::from_value(payload).map_err(|e| format!("not an envelope: {}", e))?;

    if envelope.schema != schema {
        return Err(format!(
            "schema '{}' does not match '{}'",
            envelope.schema, schema
        ));
    }

    serde_json::from_value(envelope.data).map_err(|e| format!("undecodable data: {}", e))
}

impl ResearchApi {
    /// Serve `query` from cache, or run `fetch` and cache its result.
    ///
    /// Validation runs first, so bad input never touches the cache or the
    /// network. With `no_cache` the lookup is skipped but the fresh result
    /// still replaces whatever was stored.
    pub(crate) async fn read_through<Q, F, Fut>(
        &self,
        query: &Q,
        no_cache: bool,
        fetch: F,
    ) -> Result<Cached<Q::Output>>
    where
        Q: Query,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Q::Output>>,
    {
        query.validate()?;
        let key = query.cache_key();

        if !no_cache {
            if let Some(data) = self.lookup::<Q>(&key)? {
                debug!("Cache hit for {}", key);
                return Ok(Cached::hit(data));
            }
            debug!("Cache miss for {}", key);
        }

        let data = fetch().await?;
        let payload = encode_envelope(Q::SCHEMA, &data)?;
        self.cache.set(&key, &payload, Q::TTL_HOURS)?;

        Ok(Cached::fresh(data))
    }

    /// A usable cached result, or `None` when absent, expired or unreadable.
    fn lookup<Q: Query>(&self, key: &str) -> Result<Option<Q::Output>> {
        let payload = match self.cache.get(key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(None),
            Err(ResearchError::Json { message, .. }) => {
                warn!("Ignoring corrupt cache entry {}: {}", key, message);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match decode_envelope::<Q::Output>(Q::SCHEMA, payload) {
            Ok(data) => Ok(Some(data)),
            Err(reason) => {
                warn!("Ignoring cache entry {}: {}", key, reason);
                Ok(None)
            }
        }
    }
}
