//! Substring matching over resolved items.
//!
//! Search is deliberately simple: case-insensitive containment on the
//! title or author, in listing order. No ranking, no tokenization.

use ember_core::types::Item;

/// True when the item's title or author contains the lowercased needle.
pub(crate) fn matches(item: &Item, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle) || item.by.to_lowercase().contains(needle)
}

/// Filters resolved items by query, preserving order, capped at `limit`.
pub(crate) fn filter_matches(items: Vec<Item>, query: &str, limit: usize) -> Vec<Item> {
    let needle = query.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| matches(item, &needle))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::story;

    #[test]
    fn test_matches_title_case_insensitive() {
        let item = story(1, "JavaScript Basics", "dev1");
        assert!(matches(&item, "javascript"));
        assert!(!matches(&item, "python"));
    }

    #[test]
    fn test_matches_author() {
        let item = story(1, "Weekly Digest", "dang");
        assert!(matches(&item, "dang"));
    }

    #[test]
    fn test_filter_preserves_order_and_caps() {
        let items = vec![
            story(3, "Rust 1.80", "a"),
            story(2, "Why Rust", "b"),
            story(1, "Go 1.23", "c"),
            story(4, "Rust in the kernel", "d"),
        ];
        let hits = filter_matches(items, "rust", 2);
        let ids: Vec<u64> = hits.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_filter_uppercase_query() {
        let items = vec![story(1, "JavaScript Basics", "dev1")];
        assert_eq!(filter_matches(items, "JAVASCRIPT", 50).len(), 1);
    }
}
