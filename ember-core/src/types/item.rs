//! Item types for the ember catalog.
//!
//! An [`Item`] is one entry of the upstream catalog. Items are immutable
//! once fetched: a fetch always produces a fresh value or reuses a cached
//! one verbatim, never a partial update.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog item. Always positive; the boundary layer
/// rejects zero before it reaches the core.
pub type ItemId = u64;

/// Classification of a catalog item.
///
/// The upstream `type` field only distinguishes `story`, `job` and `poll`;
/// Ask-HN and Show-HN posts arrive as plain stories and are classified by
/// their title prefix (see [`ItemKind::classify`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A regular story submission.
    Story,
    /// A job posting.
    Job,
    /// An "Ask HN" discussion post.
    Ask,
    /// A "Show HN" demo post.
    Show,
    /// A poll.
    Poll,
}

impl ItemKind {
    /// Classifies an item from the upstream type string and its title.
    ///
    /// Unknown type strings fall back to [`ItemKind::Story`]; the newest
    /// listing never carries comments or poll options.
    pub fn classify(raw_type: &str, title: &str) -> Self {
        match raw_type {
            "job" => ItemKind::Job,
            "poll" => ItemKind::Poll,
            "story" => {
                if title.starts_with("Ask HN") {
                    ItemKind::Ask
                } else if title.starts_with("Show HN") {
                    ItemKind::Show
                } else {
                    ItemKind::Story
                }
            }
            _ => ItemKind::Story,
        }
    }

    /// Returns the lowercase wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Story => "story",
            ItemKind::Job => "job",
            ItemKind::Ask => "ask",
            ItemKind::Show => "show",
            ItemKind::Poll => "poll",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, the primary key upstream.
    pub id: ItemId,
    /// Title of the submission.
    pub title: String,
    /// External URL, absent for self posts (ask/poll and some jobs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Author handle.
    pub by: String,
    /// Creation time, epoch seconds.
    pub time: u64,
    /// Current score.
    pub score: i64,
    /// Comment count, absent for jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<u32>,
    /// Item classification, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: ItemKind,
}
