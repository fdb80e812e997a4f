//! In-memory TTL cache with weighted capacity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Cache entry with TTL and weight.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
    weight: usize,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum total weight (a plain entry weighs 1)
    pub capacity: usize,
    /// Fraction of capacity freed when the limit is hit (0.0..1.0)
    pub compaction_fraction: f64,
    /// Whether to purge expired entries before evicting live ones
    pub auto_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            compaction_fraction: 0.25,
            auto_cleanup: true,
        }
    }
}

/// Generic in-memory cache with per-entry TTL and a weighted capacity.
///
/// Thread-safe; a single lock over the map is sufficient because there is
/// no cross-key consistency requirement. Expired entries are treated as
/// absent on read and physically purged opportunistically on write.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    config: CacheConfig,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Gets a cached value by key. Absent if missing or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read();
        entries.get(key).and_then(|e| {
            if e.is_expired() {
                None
            } else {
                Some(e.value.clone())
            }
        })
    }

    /// Caches a value with weight 1.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        self.set_weighted(key, value, ttl, 1);
    }

    /// Caches a value with an explicit weight.
    ///
    /// Heavy entries (like the full id listing) count for more than one
    /// weight unit toward the capacity limit.
    pub fn set_weighted(&self, key: &str, value: V, ttl: Duration, weight: usize) {
        let mut entries = self.entries.write();

        let usage: usize = entries.values().map(|e| e.weight).sum();
        if usage + weight > self.config.capacity {
            if self.config.auto_cleanup {
                entries.retain(|_, e| !e.is_expired());
            }
            self.compact(&mut entries, weight);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
                weight,
            },
        );
    }

    /// Evicts oldest-inserted entries until the incoming entry fits below
    /// the post-compaction watermark.
    fn compact(&self, entries: &mut HashMap<String, CacheEntry<V>>, incoming: usize) {
        let watermark = (self.config.capacity as f64
            * (1.0 - self.config.compaction_fraction))
            .floor() as usize;
        let target = watermark.saturating_sub(incoming);

        let mut by_age: Vec<(String, Instant, usize)> = entries
            .iter()
            .map(|(k, e)| (k.clone(), e.inserted_at, e.weight))
            .collect();
        by_age.sort_by_key(|(_, inserted_at, _)| *inserted_at);

        let mut usage: usize = by_age.iter().map(|(_, _, w)| w).sum();
        for (key, _, weight) in by_age {
            if usage <= target {
                break;
            }
            entries.remove(&key);
            usage -= weight;
        }
    }

    /// Removes a cached entry.
    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries.
    pub fn purge_expired(&self) {
        self.entries.write().retain(|_, e| !e.is_expired());
    }

    /// Returns the number of cached entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the total weight currently held.
    pub fn usage(&self) -> usize {
        self.entries.read().values().map(|e| e.weight).sum()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            usage: entries.values().map(|e| e.weight).sum(),
            capacity: self.config.capacity,
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Number of entries held, including not-yet-purged expired ones.
    pub total_entries: usize,
    /// Entries past their TTL, pending physical removal.
    pub expired_entries: usize,
    /// Entries still readable.
    pub valid_entries: usize,
    /// Total weight currently held.
    pub usage: usize,
    /// Configured weight capacity.
    pub capacity: usize,
}
