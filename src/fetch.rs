//! Cached JSON fetching
//!
//! `FetchClient` is the only way the rest of the crate obtains API documents.
//! It answers from the `PersistentCache` when it can and otherwise goes to the
//! network through a `Transport`, storing whatever comes back.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::cache::{CacheError, CacheStorage, FileStorage, PersistentCache};

/// Errors that can occur when fetching a document
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("Failed to parse JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document was valid JSON but lacked the expected fields
    #[error("Unexpected document shape at {url}: {source}")]
    Shape {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Persisting the cache failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Performs the network half of a fetch
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Issues a GET for `url` and parses the body as JSON
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Transport backed by a reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HttpTransport with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new HttpTransport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetches JSON documents through a response cache
#[derive(Debug)]
pub struct FetchClient<T = HttpTransport, S = FileStorage> {
    transport: T,
    cache: PersistentCache<S>,
}

impl<T: Transport, S: CacheStorage> FetchClient<T, S> {
    /// Creates a client that consults `cache` before using `transport`
    pub fn new(transport: T, cache: PersistentCache<S>) -> Self {
        Self { transport, cache }
    }

    /// Returns the document at `url`, from the cache when present
    ///
    /// # Arguments
    /// * `url` - Full request URL, also used as the cache key
    ///
    /// # Returns
    /// * `Ok(Value)` - The cached or freshly fetched document
    /// * `Err(FetchError)` - If the request, decoding, or a periodic flush fails
    ///
    /// Network and decode failures are returned as-is; nothing is retried.
    pub async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        if let Some(hit) = self.cache.get(url) {
            trace!(url, "Cache hit");
            return Ok(hit);
        }

        trace!(url, "Cache miss");
        let document = self.transport.get_json(url).await?;
        self.cache.put(url, document.clone())?;
        Ok(document)
    }

    /// Fetches `url` and deserializes it into `D`
    pub async fn fetch_as<D: DeserializeOwned>(&self, url: &str) -> Result<D, FetchError> {
        let document = self.fetch(url).await?;
        D::deserialize(document).map_err(|source| FetchError::Shape {
            url: url.to_string(),
            source,
        })
    }

    /// The cache this client reads and fills
    pub fn cache(&self) -> &PersistentCache<S> {
        &self.cache
    }

    /// The transport used on cache misses
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Writes the cache to storage
    pub fn flush(&self) -> Result<(), CacheError> {
        self.cache.flush()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubTransport;
    use super::*;
    use crate::cache::MemoryStorage;
    use serde::Deserialize;
    use serde_json::json;

    fn client(transport: StubTransport) -> FetchClient<StubTransport, MemoryStorage> {
        FetchClient::new(transport, PersistentCache::load(MemoryStorage::new(), 50))
    }

    #[tokio::test]
    async fn test_fetch_twice_hits_network_once() {
        let url = "https://pokeapi.co/api/v2/pokemon/pikachu";
        let client = client(StubTransport::new().with(url, json!({"height": 4})));

        let first = client.fetch(url).await.unwrap();
        let second = client.fetch(url).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.transport().requests(), vec![url.to_string()]);
        assert_eq!(client.cache().misses(), 1);
    }

    #[tokio::test]
    async fn test_fetch_prefers_preloaded_cache() {
        let url = "https://pokeapi.co/api/v2/ability/levitate";
        let storage = MemoryStorage::with_contents(format!(r#"{{"{url}": {{"pokemon": []}}}}"#));
        let client = FetchClient::new(StubTransport::new(), PersistentCache::load(storage, 50));

        let document = client.fetch(url).await.unwrap();

        assert_eq!(document, json!({"pokemon": []}));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let url = "https://pokeapi.co/api/v2/pokemon/missingno";
        let client = client(StubTransport::new());

        let result = client.fetch(url).await;

        assert!(matches!(result, Err(FetchError::Decode { .. })));
        assert!(!client.cache().contains(url));
    }

    #[tokio::test]
    async fn test_http_transport_surfaces_connection_errors() {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Client should build");
        let client = FetchClient::new(
            HttpTransport::with_client(http),
            PersistentCache::load(MemoryStorage::new(), 50),
        );
        let url = "http://127.0.0.1:9/api/v2/pokemon/pikachu";

        let result = client.fetch(url).await;

        assert!(matches!(result, Err(FetchError::Http(_))));
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_as_reports_shape_errors() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NeedsHeight {
            height: u32,
        }

        let url = "https://pokeapi.co/api/v2/pokemon/odd";
        let client = client(StubTransport::new().with(url, json!({"weight": 1})));

        let result = client.fetch_as::<NeedsHeight>(url).await;

        assert!(matches!(result, Err(FetchError::Shape { .. })));
    }

    #[tokio::test]
    async fn test_fiftieth_miss_triggers_flush() {
        let mut transport = StubTransport::new();
        for i in 0..50 {
            transport = transport.with(format!("https://x/{i}"), json!(i));
        }
        let client = client(transport);

        for i in 0..49 {
            client.fetch(&format!("https://x/{i}")).await.unwrap();
        }
        assert_eq!(client.cache().storage().write_count(), 0);

        client.fetch("https://x/49").await.unwrap();
        assert_eq!(client.cache().storage().write_count(), 1);
    }
}
