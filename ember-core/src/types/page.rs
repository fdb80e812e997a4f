//! Page types for paginated responses.

use serde::{Deserialize, Serialize};

use super::item::Item;

/// One resolved page of the newest-items feed, plus pagination metadata.
///
/// `stories.len()` may be shorter than `page_size` when some ids in the
/// page's slice could not be resolved (dead, deleted, or failed items are
/// dropped, never surfaced as errors).
///
/// Invariants: `total_pages == ceil(total_count / page_size)`, and
/// `total_pages == 0` iff `total_count == 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The resolved items of this page, in listing order.
    pub stories: Vec<Item>,
    /// Size of the id listing at the time of the request.
    pub total_count: usize,
    /// The requested 1-based page number.
    pub current_page: u32,
    /// Total number of pages at the current listing size.
    pub total_pages: u32,
    /// The requested page size.
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page {
            stories: vec![],
            total_count: 500,
            current_page: 2,
            total_pages: 17,
            page_size: 30,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 500);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 17);
        assert_eq!(json["pageSize"], 30);
        assert!(json.get("total_count").is_none());
    }
}
