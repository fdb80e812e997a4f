//! HTTP client for the Hacker News Firebase API.
//!
//! Upstream offers exactly two read operations: `GET /newstories.json`
//! returning the ordered id listing, and `GET /item/{id}.json` returning
//! one item or `null`. Both are wrapped here with a fixed timeout, a
//! static identifying header, and prompt cancellation.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use ember_core::error::{EmberError, Result};
use ember_core::traits::ItemSource;
use ember_core::types::{Item, ItemId, ItemKind};

const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
const DEFAULT_USER_AGENT: &str = concat!("ember/", env!("CARGO_PKG_VERSION"));

/// Upstream client configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HnConfig {
    /// Base URL of the Firebase API (no trailing slash)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HnConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl HnConfig {
    /// Creates a config pointing at a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Client for the Hacker News Firebase API.
pub struct HnClient {
    config: HnConfig,
    http_client: reqwest::Client,
}

impl HnClient {
    /// Creates a new client with default configuration.
    pub fn new() -> Self {
        Self::with_config(HnConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: HnConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> EmberError {
        if err.is_timeout() {
            EmberError::UpstreamTimeout {
                seconds: self.config.timeout_seconds,
            }
        } else if err.is_decode() {
            EmberError::UpstreamMalformed(err.to_string())
        } else {
            EmberError::UpstreamUnavailable(err.to_string())
        }
    }

    async fn get_listing(&self) -> Result<Vec<ItemId>> {
        let response = self
            .http_client
            .get(self.url("newstories.json"))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(EmberError::UpstreamUnavailable(format!(
                "listing request failed with HTTP {}",
                response.status()
            )));
        }

        let ids: Vec<ItemId> = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!(count = ids.len(), "Fetched newest-items listing");
        Ok(ids)
    }

    async fn get_item(&self, id: ItemId) -> Result<Item> {
        let response = self
            .http_client
            .get(self.url(&format!("item/{id}.json")))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        // The upstream answers 200 with a `null` body for unknown ids, but
        // map any non-success status the same way.
        if !response.status().is_success() {
            return Err(EmberError::ItemNotFound(id));
        }

        let wire: Option<WireItem> = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        match wire {
            Some(wire) => wire.into_item(),
            None => Err(EmberError::ItemNotFound(id)),
        }
    }
}

impl Default for HnClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemSource for HnClient {
    #[instrument(skip(self, cancel))]
    async fn list_ids(&self, cancel: &CancellationToken) -> Result<Vec<ItemId>> {
        tokio::select! {
            _ = cancel.cancelled() => Err(EmberError::Cancelled),
            result = self.get_listing() => result,
        }
    }

    #[instrument(skip(self, cancel))]
    async fn fetch_item(&self, id: ItemId, cancel: &CancellationToken) -> Result<Item> {
        tokio::select! {
            _ = cancel.cancelled() => Err(EmberError::Cancelled),
            result = self.get_item(id) => result,
        }
    }
}

/// Raw item payload as the Firebase API serves it. Every field except `id`
/// may be missing; deleted and dead items keep their id but lose the rest.
#[derive(Debug, Deserialize)]
struct WireItem {
    id: ItemId,
    title: Option<String>,
    url: Option<String>,
    by: Option<String>,
    time: Option<u64>,
    score: Option<i64>,
    descendants: Option<u32>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    dead: bool,
}

impl WireItem {
    /// Converts the wire payload into a domain item.
    ///
    /// Deleted, dead, and title-less or author-less payloads resolve to
    /// `ItemNotFound`: they cannot be rendered or searched, so the rest of
    /// the service treats them exactly like missing ids.
    fn into_item(self) -> Result<Item> {
        if self.deleted || self.dead {
            return Err(EmberError::ItemNotFound(self.id));
        }

        let (title, by) = match (self.title, self.by) {
            (Some(title), Some(by)) => (title, by),
            _ => return Err(EmberError::ItemNotFound(self.id)),
        };

        let raw_type = self.item_type.as_deref().unwrap_or("story");
        let kind = ItemKind::classify(raw_type, &title);

        Ok(Item {
            id: self.id,
            title,
            url: self.url,
            by,
            time: self.time.unwrap_or(0),
            score: self.score.unwrap_or(0),
            descendants: self.descendants,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> HnClient {
        HnClient::with_config(HnConfig::with_base_url(server.uri()))
    }

    fn story_body(id: u64, title: &str, by: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "by": by,
            "time": 1_700_000_000,
            "score": 42,
            "descendants": 3,
            "type": "story",
            "url": "https://example.com"
        })
    }

    #[tokio::test]
    async fn test_list_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/newstories.json"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([3, 2, 1])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let ids = client.list_ids(&CancellationToken::new()).await.unwrap();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_ids_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/newstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .list_ids(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EmberError::UpstreamMalformed(_)));
    }

    #[tokio::test]
    async fn test_list_ids_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/newstories.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .list_ids(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_systemic());
    }

    #[tokio::test]
    async fn test_fetch_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/8863.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(story_body(8863, "My YC app", "dhouston")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let item = client
            .fetch_item(8863, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(item.id, 8863);
        assert_eq!(item.by, "dhouston");
        assert_eq!(item.kind, ItemKind::Story);
    }

    #[tokio::test]
    async fn test_fetch_item_null_body_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/999.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .fetch_item(999, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_item_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/999.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .fetch_item(999, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_item_deleted_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/77.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 77, "deleted": true, "type": "story"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .fetch_item(77, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_item_ask_classified_by_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/5.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(story_body(5, "Ask HN: Who is hiring?", "whoishiring")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let item = client
            .fetch_item(5, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(item.kind, ItemKind::Ask);
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/newstories.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([1]))
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client.list_ids(&cancel).await.unwrap_err();
        assert!(matches!(err, EmberError::Cancelled));
    }

    #[test]
    fn test_config_defaults() {
        let config = HnConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds, 30);
    }
}
