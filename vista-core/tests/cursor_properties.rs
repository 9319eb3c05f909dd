//! Property tests for page cursor links and refresh key resolution.

use proptest::prelude::*;
use vista_core::paging::paginator::resolve_refresh_key;
use vista_core::paging::{Cursor, Page, PagingState};

fn build_pages(sizes: &[usize]) -> Vec<Page<u32>> {
    sizes
        .iter()
        .enumerate()
        .map(|(index, &len)| {
            let cursor = Cursor::new(index as u32 + 1).unwrap();
            Page::for_cursor(cursor, vec![0; len])
        })
        .collect()
}

proptest! {
    #[test]
    fn page_links_follow_cursor(page in 1u32..10_000, len in 0usize..50) {
        let cursor = Cursor::new(page).unwrap();
        let built = Page::for_cursor(cursor, vec![(); len]);

        prop_assert_eq!(built.prev_cursor.is_none(), page == 1);
        prop_assert_eq!(built.next_cursor.is_none(), len == 0);
        if let Some(prev) = built.prev_cursor {
            prop_assert_eq!(prev.next(), cursor);
        }
        if let Some(next) = built.next_cursor {
            prop_assert_eq!(next.previous(), Some(cursor));
        }
    }

    #[test]
    fn consecutive_pages_link_both_ways(sizes in prop::collection::vec(1usize..30, 2..8)) {
        let pages = build_pages(&sizes);
        for pair in pages.windows(2) {
            let following = pair[1].prev_cursor.map(Cursor::next);
            prop_assert_eq!(pair[0].next_cursor, following);
        }
    }

    #[test]
    fn refresh_key_reloads_anchor_page(
        sizes in prop::collection::vec(1usize..30, 1..8),
        anchor in 0usize..300,
    ) {
        let pages = build_pages(&sizes);
        let total: usize = sizes.iter().sum();
        let state = PagingState::new(&pages, Some(anchor));

        // page holding the anchor, or the last page past the end
        let mut expected = sizes.len() as u32;
        let mut seen = 0;
        for (index, len) in sizes.iter().enumerate() {
            seen += len;
            if anchor < seen {
                expected = index as u32 + 1;
                break;
            }
        }
        prop_assert!(anchor < total || expected == sizes.len() as u32);
        prop_assert_eq!(resolve_refresh_key(&state), Cursor::new(expected));
    }

    #[test]
    fn refresh_key_without_anchor_is_first_page(sizes in prop::collection::vec(0usize..30, 0..8)) {
        let pages = build_pages(&sizes);
        prop_assert_eq!(resolve_refresh_key(&PagingState::new(&pages, None)), None);
    }
}
