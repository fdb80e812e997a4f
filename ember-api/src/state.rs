//! App state: feed service and config.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use ember_core::traits::ItemSource;
use ember_feed::{CacheConfig, FeedConfig, FeedService};
use ember_upstream::{HnClient, HnConfig};

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub hn_base_url: String,
    pub listing_ttl_seconds: u64,
    pub item_ttl_seconds: u64,
    pub cache_capacity: usize,
    pub cache_compaction_fraction: f64,
    pub upstream_timeout_seconds: u64,
    pub search_fanout_multiplier: u32,
}

const DEFAULT_HN_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            hn_base_url: DEFAULT_HN_BASE_URL.into(),
            listing_ttl_seconds: 300,
            item_ttl_seconds: 1800,
            cache_capacity: 1000,
            cache_compaction_fraction: 0.25,
            upstream_timeout_seconds: 30,
            search_fanout_multiplier: 2,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            hn_base_url: std::env::var("HN_BASE_URL").unwrap_or(defaults.hn_base_url),
            listing_ttl_seconds: env_parse("LISTING_TTL_SECS", defaults.listing_ttl_seconds),
            item_ttl_seconds: env_parse("ITEM_TTL_SECS", defaults.item_ttl_seconds),
            cache_capacity: env_parse("CACHE_MAX_ENTRIES", defaults.cache_capacity),
            cache_compaction_fraction: env_parse(
                "CACHE_COMPACTION_FRACTION",
                defaults.cache_compaction_fraction,
            ),
            upstream_timeout_seconds: env_parse(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_seconds,
            ),
            search_fanout_multiplier: env_parse(
                "SEARCH_FANOUT_MULTIPLIER",
                defaults.search_fanout_multiplier,
            ),
        }
    }

    fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            listing_ttl_seconds: self.listing_ttl_seconds,
            item_ttl_seconds: self.item_ttl_seconds,
            cache: CacheConfig {
                capacity: self.cache_capacity,
                compaction_fraction: self.cache_compaction_fraction,
                auto_cleanup: true,
            },
            search_fanout_multiplier: self.search_fanout_multiplier,
            ..FeedConfig::default()
        }
    }
}

pub struct AppState {
    pub config: ApiConfig,
    pub feed: FeedService,
    /// Parent of every request's cancellation token; cancelled on shutdown.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        let client = HnClient::with_config(HnConfig {
            base_url: config.hn_base_url.clone(),
            timeout_seconds: config.upstream_timeout_seconds,
            ..HnConfig::default()
        });
        Self::with_source(config, Arc::new(client))
    }

    /// Builds state around an arbitrary item source. Tests inject a
    /// scripted source here instead of the live client.
    pub fn with_source(config: ApiConfig, source: Arc<dyn ItemSource>) -> Self {
        let feed = FeedService::with_config(config.feed_config(), source);
        Self {
            config,
            feed,
            shutdown: CancellationToken::new(),
        }
    }
}
