//! DTOs for API requests and responses.
//!
//! The item and page bodies themselves serialize straight from
//! `ember-core` types; only queries and the health body live here.

use serde::{Deserialize, Serialize};

/// Query parameters for the stories listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoriesQuery {
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Items per page, 1..=50 (default 30)
    pub page_size: Option<u32>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query, matched as a case-insensitive substring
    pub q: Option<String>,
    /// Result cap, 1..=100 (default 50)
    pub limit: Option<u32>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Entries currently held in the cache
    pub cache_entries: usize,
}
