//! TTL cache for the ember aggregation service.
//!
//! Generic in-memory cache with configurable capacity and expiration.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod cache;

pub use cache::{CacheConfig, CacheStats, TtlCache};
