//! Pagination over the id listing.
//!
//! Pure slicing arithmetic; the boundary layer enforces the upper bounds
//! on `page` and `page_size` before calling in.

use ember_core::types::ItemId;

/// Total number of pages for a listing of `total_count` ids.
///
/// `ceil(total_count / page_size)`; zero iff the listing is empty.
pub fn total_pages(total_count: usize, page_size: u32) -> u32 {
    debug_assert!(page_size >= 1);
    let page_size = page_size as usize;
    ((total_count + page_size - 1) / page_size) as u32
}

/// The slice of ids belonging to the given 1-based page.
///
/// Out-of-range pages yield an empty slice, never an error.
pub fn slice(listing: &[ItemId], page: u32, page_size: u32) -> &[ItemId] {
    debug_assert!(page >= 1 && page_size >= 1);
    let start = (page as usize - 1).saturating_mul(page_size as usize);
    if start >= listing.len() {
        return &[];
    }
    let end = start.saturating_add(page_size as usize).min(listing.len());
    &listing[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0, 30 => 0)]
    #[test_case(1, 30 => 1)]
    #[test_case(30, 30 => 1)]
    #[test_case(31, 30 => 2)]
    #[test_case(500, 30 => 17)]
    #[test_case(5, 2 => 3)]
    fn test_total_pages(total_count: usize, page_size: u32) -> u32 {
        total_pages(total_count, page_size)
    }

    #[test]
    fn test_slice_first_page() {
        let listing = vec![1, 2, 3, 4, 5];
        assert_eq!(slice(&listing, 1, 2), &[1, 2]);
        assert_eq!(total_pages(listing.len(), 2), 3);
    }

    #[test]
    fn test_slice_middle_and_last_page() {
        let listing = vec![1, 2, 3, 4, 5];
        assert_eq!(slice(&listing, 2, 2), &[3, 4]);
        // Last page is shorter than page_size.
        assert_eq!(slice(&listing, 3, 2), &[5]);
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        let listing = vec![1, 2, 3];
        assert!(slice(&listing, 4, 2).is_empty());
        assert!(slice(&listing, 1000, 50).is_empty());
    }

    #[test]
    fn test_slice_empty_listing() {
        assert!(slice(&[], 1, 30).is_empty());
        assert_eq!(total_pages(0, 30), 0);
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceil(total in 0usize..100_000, page_size in 1u32..=100) {
            let expected = (total as f64 / page_size as f64).ceil() as u32;
            prop_assert_eq!(total_pages(total, page_size), expected);
        }

        #[test]
        fn prop_slice_never_exceeds_page_size(
            len in 0usize..2_000,
            page in 1u32..=100,
            page_size in 1u32..=50,
        ) {
            let listing: Vec<u64> = (1..=len as u64).collect();
            let ids = slice(&listing, page, page_size);
            prop_assert!(ids.len() <= page_size as usize);
        }

        #[test]
        fn prop_pages_cover_listing_exactly_once(len in 0usize..500, page_size in 1u32..=50) {
            let listing: Vec<u64> = (1..=len as u64).collect();
            let pages = total_pages(len, page_size);
            let mut covered = Vec::new();
            for page in 1..=pages {
                covered.extend_from_slice(slice(&listing, page, page_size));
            }
            prop_assert_eq!(covered, listing);
        }
    }
}
