//! Domain types for ember.
//!
//! - [`Item`]: one catalog entry, immutable once fetched
//! - [`ItemKind`]: the story/job/ask/show/poll classification
//! - [`Page`]: one resolved page plus its pagination metadata

mod item;
mod page;

pub use item::*;
pub use page::*;
