//! Concurrent cache-first item resolution.
//!
//! The fan-out/fan-in at the heart of the service: a batch of ids is
//! dispatched concurrently (bounded), each id consults the cache before
//! touching upstream, and the results are reassembled in input order by
//! writing them into a pre-sized slot buffer.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ember_core::error::{EmberError, Result};
use ember_core::types::{Item, ItemId};

use crate::{item_key, CacheValue, FeedService};

/// Outcome of resolving one id.
///
/// `NotFound` and `TransientError` are both dropped from batch output,
/// but the distinction keeps the drop policy an explicit branch and lets
/// systemic failures be logged where expected ones are not.
#[derive(Clone, Debug)]
pub enum FetchOutcome {
    /// The item resolved, from cache or upstream.
    Found(Item),
    /// The id does not resolve to a live item (missing, deleted, dead).
    NotFound,
    /// Upstream failed systemically for this id; not retried.
    TransientError,
}

/// Result of resolving a batch of ids.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Resolved items, in the order of the input ids.
    pub items: Vec<Item>,
    /// True when the cancellation token fired before the batch finished;
    /// `items` then holds whatever was already collected.
    pub cancelled: bool,
}

impl FeedService {
    /// Resolves one id, cache-first.
    ///
    /// Errs only on cancellation; every other failure collapses into the
    /// tagged outcome.
    pub(crate) async fn fetch_one(
        &self,
        id: ItemId,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome> {
        let key = item_key(id);
        if let Some(CacheValue::Item(item)) = self.cache.get(&key) {
            debug!(id, "Item cache hit");
            return Ok(FetchOutcome::Found(item));
        }

        match self.source.fetch_item(id, cancel).await {
            Ok(item) => {
                self.cache.set(
                    &key,
                    CacheValue::Item(item.clone()),
                    Duration::from_secs(self.config.item_ttl_seconds),
                );
                Ok(FetchOutcome::Found(item))
            }
            Err(EmberError::Cancelled) => Err(EmberError::Cancelled),
            Err(e) if e.is_not_found() => {
                debug!(id, "Dropping id: not found upstream");
                Ok(FetchOutcome::NotFound)
            }
            Err(e) => {
                warn!(id, error = %e, "Dropping id after upstream failure");
                Ok(FetchOutcome::TransientError)
            }
        }
    }

    /// Resolves a batch of ids concurrently, preserving input order.
    ///
    /// Concurrency is bounded by `min(batch_len, max_concurrency)`. Ids
    /// that resolve to `NotFound` or `TransientError` are dropped, so the
    /// output may be shorter than the input. Never fails: cancellation is
    /// reported through [`Resolution::cancelled`].
    pub(crate) async fn resolve_items(
        &self,
        ids: &[ItemId],
        cancel: &CancellationToken,
    ) -> Resolution {
        if ids.is_empty() {
            return Resolution {
                items: Vec::new(),
                cancelled: cancel.is_cancelled(),
            };
        }

        let limit = ids.len().min(self.config.max_concurrency.max(1));
        let mut slots: Vec<Option<Item>> = vec![None; ids.len()];

        let mut in_flight = stream::iter(
            ids.iter()
                .copied()
                .enumerate()
                .map(|(slot, id)| async move { (slot, self.fetch_one(id, cancel).await) }),
        )
        .buffer_unordered(limit);

        let mut cancelled = false;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = in_flight.next() => match next {
                    Some((slot, Ok(FetchOutcome::Found(item)))) => slots[slot] = Some(item),
                    Some((_, Ok(FetchOutcome::NotFound)))
                    | Some((_, Ok(FetchOutcome::TransientError))) => {}
                    Some((_, Err(_))) => {
                        cancelled = true;
                        break;
                    }
                    None => break,
                },
            }
        }
        drop(in_flight);

        Resolution {
            items: slots.into_iter().flatten().collect(),
            cancelled,
        }
    }
}
