//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Newest-items feed
        .route("/api/v1/stories", get(handlers::get_stories))
        .route("/api/v1/stories/:id", get(handlers::get_story))
        // Search
        .route("/api/v1/search", get(handlers::search_stories))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ApiConfig;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use ember_core::error::{EmberError, Result};
    use ember_core::traits::ItemSource;
    use ember_core::types::{Item, ItemId, ItemKind};

    /// Three-item catalog, no latencies, no failures.
    struct StubSource;

    fn stub_item(id: ItemId, title: &str) -> Item {
        Item {
            id,
            title: title.into(),
            url: None,
            by: "stub".into(),
            time: 1_700_000_000,
            score: 1,
            descendants: None,
            kind: ItemKind::Story,
        }
    }

    #[async_trait]
    impl ItemSource for StubSource {
        async fn list_ids(&self, _cancel: &CancellationToken) -> Result<Vec<ItemId>> {
            Ok(vec![3, 2, 1])
        }

        async fn fetch_item(&self, id: ItemId, _cancel: &CancellationToken) -> Result<Item> {
            match id {
                1 => Ok(stub_item(1, "First post")),
                2 => Ok(stub_item(2, "Second post")),
                3 => Ok(stub_item(3, "Show HN: Ember")),
                _ => Err(EmberError::ItemNotFound(id)),
            }
        }
    }

    fn test_app() -> Router {
        let state = Arc::new(AppState::with_source(
            ApiConfig::default(),
            Arc::new(StubSource),
        ));
        create_router(state)
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(
            axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = get(test_app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_stories() {
        let response = get(test_app(), "/api/v1/stories?page=1&pageSize=2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["stories"].as_array().unwrap().len(), 2);
        assert_eq!(body["stories"][0]["id"], 3);
    }

    #[tokio::test]
    async fn test_get_stories_defaults() {
        let response = get(test_app(), "/api/v1/stories").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_stories_rejects_bad_page() {
        let response = get(test_app(), "/api/v1/stories?page=0").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_stories_rejects_oversized_page_size() {
        let response = get(test_app(), "/api/v1/stories?pageSize=51").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_story_by_id() {
        let response = get(test_app(), "/api/v1/stories/2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["id"], 2);
        assert_eq!(body["type"], "story");
    }

    #[tokio::test]
    async fn test_get_story_missing_is_404() {
        let response = get(test_app(), "/api/v1/stories/99").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_story_zero_id_rejected() {
        let response = get(test_app(), "/api/v1/stories/0").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_search() {
        let response = get(test_app(), "/api/v1/search?q=ember&limit=10").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Show HN: Ember");
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let response = get(test_app(), "/api/v1/search?q=%20&limit=10").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_search_rejects_bad_limit() {
        let response = get(test_app(), "/api/v1/search?q=ember&limit=101").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = get(test_app(), "/api/v1/stories?page=0").await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].is_string());
    }
}
