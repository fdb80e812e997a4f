//! API route handlers.
//!
//! Handlers own input validation: the feed service requires `page >= 1`
//! and bounded sizes, and everything is rejected here before calling in.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use ember_core::types::{Item, Page};

use crate::dto::{HealthResponse, SearchQuery, StoriesQuery};
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

const MAX_PAGE_SIZE: u32 = 50;
const DEFAULT_PAGE_SIZE: u32 = 30;
const MAX_SEARCH_LIMIT: u32 = 100;
const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// GET /api/v1/stories
pub async fn get_stories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StoriesQuery>,
) -> Result<Json<Page>> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        return Err(ApiError::validation("page must be >= 1"));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::validation(format!(
            "pageSize must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let cancel = state.shutdown.child_token();
    let result = state.feed.newest(page, page_size, &cancel).await?;

    debug!(
        page,
        page_size,
        stories = result.stories.len(),
        "Served stories page"
    );
    Ok(Json(result))
}

/// GET /api/v1/stories/:id
pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Item>> {
    if id == 0 {
        return Err(ApiError::validation("id must be > 0"));
    }

    let cancel = state.shutdown.child_token();
    match state.feed.by_id(id, &cancel).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::not_found(format!("story {id} not found"))),
    }
}

/// GET /api/v1/search
pub async fn search_stories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>> {
    let q = query.q.as_deref().unwrap_or("").trim().to_string();
    if q.is_empty() {
        return Err(ApiError::validation("q must be a non-empty string"));
    }

    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "limit must be between 1 and {MAX_SEARCH_LIMIT}"
        )));
    }

    let cancel = state.shutdown.child_token();
    let hits = state.feed.search(&q, limit, &cancel).await?;

    debug!(query = %q, limit, hits = hits.len(), "Served search");
    Ok(Json(hits))
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);
    let uptime = start.elapsed().as_secs();

    let stats = state.feed.cache_stats();

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: uptime,
        cache_entries: stats.valid_entries,
    })
}
