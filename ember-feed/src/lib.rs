//! # Ember Feed
//!
//! The aggregation core of ember: a paginated, searchable view over the
//! newest-items feed of an upstream catalog that only offers "list ids"
//! and "fetch one item" operations.
//!
//! ## Features
//!
//! - **Two-tier caching**: one weighted TTL cache holds the id listing
//!   snapshot and every individually fetched item
//! - **Bounded fan-out**: page and search batches resolve concurrently,
//!   reassembled in listing order regardless of completion order
//! - **Best-effort resolution**: a dead or failing item is dropped, never
//!   a request failure; only listing-level failures propagate
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ember_feed::FeedService;
//! use ember_upstream::HnClient;
//! use tokio_util::sync::CancellationToken;
//!
//! let feed = FeedService::new(Arc::new(HnClient::new()));
//! let page = feed.newest(1, 30, &CancellationToken::new()).await?;
//! println!("{} of {} stories", page.stories.len(), page.total_count);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod fetch;
pub mod page;
mod search;

pub use ember_cache::{CacheConfig, CacheStats};
pub use fetch::{FetchOutcome, Resolution};

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use ember_cache::TtlCache;
use ember_core::error::{EmberError, Result};
use ember_core::traits::ItemSource;
use ember_core::types::{Item, ItemId, Page};

/// Cache key of the id-listing snapshot.
const LISTING_KEY: &str = "listing";

/// Weight of the listing entry. The snapshot holds ~500 ids, so it counts
/// for several item entries toward the cache capacity.
const LISTING_WEIGHT: usize = 8;

fn item_key(id: ItemId) -> String {
    format!("item:{id}")
}

/// What the shared cache stores under its two key families.
#[derive(Clone)]
enum CacheValue {
    Listing(Arc<Vec<ItemId>>),
    Item(Item),
}

/// Feed service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// TTL of the id-listing snapshot in seconds
    pub listing_ttl_seconds: u64,
    /// TTL of an individual item in seconds
    pub item_ttl_seconds: u64,
    /// Cache capacity and compaction settings
    pub cache: CacheConfig,
    /// Search scans the first `limit * multiplier` listing ids
    pub search_fanout_multiplier: u32,
    /// Ceiling on concurrent upstream fetches within one batch
    pub max_concurrency: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            listing_ttl_seconds: 300,
            item_ttl_seconds: 1800,
            cache: CacheConfig::default(),
            search_fanout_multiplier: 2,
            max_concurrency: 100,
        }
    }
}

/// The aggregation service.
///
/// Owns the process-wide cache and the upstream source; shared across
/// request tasks behind an `Arc`. All operations take the request's
/// cancellation token and stop promptly when it fires, without touching
/// unrelated requests or cache state.
pub struct FeedService {
    source: Arc<dyn ItemSource>,
    cache: TtlCache<CacheValue>,
    config: FeedConfig,
}

impl FeedService {
    /// Creates a service with default configuration.
    pub fn new(source: Arc<dyn ItemSource>) -> Self {
        Self::with_config(FeedConfig::default(), source)
    }

    /// Creates a service with custom configuration.
    pub fn with_config(config: FeedConfig, source: Arc<dyn ItemSource>) -> Self {
        Self {
            source,
            cache: TtlCache::with_config(config.cache.clone()),
            config,
        }
    }

    /// Returns the current newest-items listing, most-recent-first.
    ///
    /// Refresh is folded into the cache read path: a miss triggers one
    /// upstream `list_ids` call and stores the snapshot wholesale.
    /// Concurrent misses may race into duplicate upstream calls; the last
    /// write wins and both callers get a complete snapshot.
    #[instrument(skip(self, cancel))]
    pub async fn listing(&self, cancel: &CancellationToken) -> Result<Arc<Vec<ItemId>>> {
        if let Some(CacheValue::Listing(ids)) = self.cache.get(LISTING_KEY) {
            debug!(count = ids.len(), "Listing cache hit");
            return Ok(ids);
        }

        let ids = Arc::new(self.source.list_ids(cancel).await?);
        self.cache.set_weighted(
            LISTING_KEY,
            CacheValue::Listing(ids.clone()),
            Duration::from_secs(self.config.listing_ttl_seconds),
            LISTING_WEIGHT,
        );
        info!(count = ids.len(), "Refreshed newest-items listing");
        Ok(ids)
    }

    /// Returns one resolved page of the newest-items feed.
    ///
    /// The caller enforces `page >= 1` and the upper bound on `page_size`.
    /// Listing-level upstream failures propagate; individual items that
    /// fail to resolve are dropped, so the page may come back shorter
    /// than `page_size`.
    #[instrument(skip(self, cancel))]
    pub async fn newest(
        &self,
        page: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<Page> {
        let listing = self.listing(cancel).await?;
        let ids = page::slice(&listing, page, page_size);

        let resolution = self.resolve_items(ids, cancel).await;
        if resolution.cancelled {
            return Err(EmberError::Cancelled);
        }

        debug!(
            page,
            requested = ids.len(),
            resolved = resolution.items.len(),
            "Resolved page"
        );

        Ok(Page {
            stories: resolution.items,
            total_count: listing.len(),
            current_page: page,
            total_pages: page::total_pages(listing.len(), page_size),
            page_size,
        })
    }

    /// Fetches one item by id, cache-first.
    ///
    /// `None` covers every way an item can fail to resolve, including
    /// systemic upstream failures; per the propagation policy no single
    /// item failure surfaces as a request error. Only cancellation
    /// propagates.
    #[instrument(skip(self, cancel))]
    pub async fn by_id(&self, id: ItemId, cancel: &CancellationToken) -> Result<Option<Item>> {
        match self.fetch_one(id, cancel).await? {
            FetchOutcome::Found(item) => Ok(Some(item)),
            FetchOutcome::NotFound | FetchOutcome::TransientError => Ok(None),
        }
    }

    /// Searches the newest items by case-insensitive substring on title
    /// or author.
    ///
    /// An empty or whitespace-only query means "newest items": it
    /// delegates to [`FeedService::newest`] with `limit` as the page
    /// size. Otherwise the first `limit * search_fanout_multiplier`
    /// listing ids are resolved and filtered, so upstream work stays
    /// bounded regardless of catalog size.
    #[instrument(skip(self, cancel))]
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Item>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(self.newest(1, limit, cancel).await?.stories);
        }

        let listing = self.listing(cancel).await?;
        let scan = (limit as usize)
            .saturating_mul(self.config.search_fanout_multiplier as usize)
            .min(listing.len());

        let resolution = self.resolve_items(&listing[..scan], cancel).await;
        if resolution.cancelled {
            return Err(EmberError::Cancelled);
        }

        let hits = search::filter_matches(resolution.items, query, limit as usize);
        debug!(query, scanned = scan, hits = hits.len(), "Search complete");
        Ok(hits)
    }

    /// Returns statistics of the shared cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
