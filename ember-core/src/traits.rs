//! Common traits for ember.
//!
//! These traits define the interfaces that different implementations can satisfy,
//! enabling modularity and testing.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::{Item, ItemId};

// ═══════════════════════════════════════════════════════════════════════════════
// ITEM SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to the remote item catalog.
///
/// Implementations might use:
/// - The Hacker News Firebase API (production)
/// - A scripted in-memory source (for testing)
///
/// Both operations must honor the cancellation token promptly: when it
/// fires, abort in-flight I/O and return [`EmberError::Cancelled`].
///
/// [`EmberError::Cancelled`]: crate::error::EmberError::Cancelled
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Returns the current newest-items listing, most-recent-first.
    ///
    /// This is the only bulk operation upstream offers; everything else
    /// is fetched one item at a time.
    async fn list_ids(&self, cancel: &CancellationToken) -> Result<Vec<ItemId>>;

    /// Fetches one item by id.
    ///
    /// Fails with [`EmberError::ItemNotFound`] when the id does not
    /// resolve to a live item — an expected outcome, not a request
    /// failure.
    ///
    /// [`EmberError::ItemNotFound`]: crate::error::EmberError::ItemNotFound
    async fn fetch_item(&self, id: ItemId, cancel: &CancellationToken) -> Result<Item>;
}
