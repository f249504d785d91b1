//! Slicing an aggregate into pages.

use crate::models::{PaginationEnvelope, PaginationInfo};

/// Return page `page` (1-based) of `list`, treating at most `count` items as visible.
///
/// The visible total is `min(count, list.len())`, so a short aggregate never
/// promises pages it cannot fill. A page past the end, a zero page or a zero
/// page size yields no items and `has_more = false`.
pub fn paginate<T: Clone>(
    list: &[T],
    page: u32,
    page_size: u32,
    count: u32,
) -> PaginationEnvelope<T> {
    if page == 0 || page_size == 0 {
        return PaginationEnvelope::empty(page, page_size, count);
    }

    let effective_total = (count as usize).min(list.len());
    let size = page_size as usize;
    let total_pages = effective_total.div_ceil(size);
    let page_index = page as usize;

    if page_index > total_pages {
        return PaginationEnvelope::empty(page, page_size, count);
    }

    let start = (page_index - 1) * size;
    let end = (start + size).min(effective_total);

    PaginationEnvelope {
        items: list[start..end].to_vec(),
        pagination: PaginationInfo {
            page,
            page_size,
            total_requested: count,
            has_more: page_index < total_pages && page_index * size < effective_total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn items(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_twelve_of_ten_per_page() {
        let list = items(12);

        let first = paginate(&list, 1, 10, 12);
        assert_eq!(first.items, items(10));
        assert!(first.pagination.has_more);

        let second = paginate(&list, 2, 10, 12);
        assert_eq!(second.items, vec![11, 12]);
        assert!(!second.pagination.has_more);
        assert_eq!(second.pagination.total_requested, 12);
    }

    #[test]
    fn test_empty_list_first_page() {
        let envelope = paginate::<u32>(&[], 1, 25, 10);
        assert!(envelope.items.is_empty());
        assert!(!envelope.pagination.has_more);
        assert_eq!(envelope.pagination.page, 1);
    }

    #[test]
    fn test_page_beyond_total_is_empty() {
        let envelope = paginate(&items(20), 3, 10, 20);
        assert!(envelope.items.is_empty());
        assert!(!envelope.pagination.has_more);
    }

    #[test]
    fn test_count_caps_visible_items() {
        let list = items(30);

        let last = paginate(&list, 2, 10, 15);
        assert_eq!(last.items, (11..=15).collect::<Vec<_>>());
        assert!(!last.pagination.has_more);

        assert!(paginate(&list, 3, 10, 15).items.is_empty());
    }

    #[test]
    fn test_short_aggregate_caps_pages() {
        // 40 requested but only 7 exist.
        let list = items(7);

        let first = paginate(&list, 1, 5, 40);
        assert_eq!(first.items.len(), 5);
        assert!(first.pagination.has_more);

        let second = paginate(&list, 2, 5, 40);
        assert_eq!(second.items, vec![6, 7]);
        assert!(!second.pagination.has_more);
        assert_eq!(second.pagination.total_requested, 40);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let list = items(20);
        assert!(!paginate(&list, 2, 10, 20).pagination.has_more);
        assert!(paginate(&list, 3, 10, 20).items.is_empty());
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        assert!(paginate(&items(5), 0, 5, 5).items.is_empty());
        assert!(paginate(&items(5), 1, 0, 5).items.is_empty());
    }

    proptest! {
        #[test]
        fn prop_pages_concatenate_to_capped_list(
            len in 0u32..120,
            count in 1u32..150,
            page_size in 1u32..=50,
        ) {
            let list = items(len);
            let mut collected = Vec::new();
            let mut page = 1;

            loop {
                let envelope = paginate(&list, page, page_size, count);
                prop_assert!(envelope.items.len() <= page_size as usize);
                collected.extend(envelope.items);
                if !envelope.pagination.has_more {
                    break;
                }
                page += 1;
            }

            let expected: Vec<u32> = list.iter().copied().take(count as usize).collect();
            prop_assert_eq!(collected, expected);
        }

        #[test]
        fn prop_pages_past_end_are_empty(
            len in 0u32..120,
            count in 1u32..150,
            page_size in 1u32..=50,
            extra in 1u32..5,
        ) {
            let list = items(len);
            let visible = count.min(len);
            let total_pages = visible.div_ceil(page_size);

            let envelope = paginate(&list, total_pages + extra, page_size, count);
            prop_assert!(envelope.items.is_empty());
            prop_assert!(!envelope.pagination.has_more);
        }
    }
}
