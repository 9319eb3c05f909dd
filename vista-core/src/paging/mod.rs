//! Cursor-based paging over the remote catalog.
//!
//! Cursors are 1-based page numbers. A page with no items is the only end of
//! stream signal; short pages are not terminal.

pub mod feed;
pub mod paginator;

use std::num::NonZeroU32;

pub use feed::{PageSource, PhotoFeed, VideoFeed};
pub use paginator::Paginator;

use crate::errors::CatalogError;
use crate::remote::DEFAULT_PAGE_SIZE;

/// Page number within a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(u32);

impl Cursor {
    /// First page of every feed.
    pub const FIRST: Cursor = Cursor(1);

    /// Creates a cursor, rejecting page zero.
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self(page))
    }

    pub fn page(self) -> u32 {
        self.0
    }

    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    /// Cursor of the preceding page, absent for the first page.
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }

    /// Cursor of the following page.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}", self.0)
    }
}

/// Request for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadRequest {
    /// Absent means the first page
    pub cursor: Option<Cursor>,
    pub page_size: NonZeroU32,
}

impl LoadRequest {
    pub fn first(page_size: NonZeroU32) -> Self {
        Self {
            cursor: None,
            page_size,
        }
    }

    pub fn at(cursor: Cursor, page_size: NonZeroU32) -> Self {
        Self {
            cursor: Some(cursor),
            page_size,
        }
    }

    /// Page actually requested from the catalog.
    pub fn resolved_cursor(&self) -> Cursor {
        self.cursor.unwrap_or(Cursor::FIRST)
    }
}

impl Default for LoadRequest {
    fn default() -> Self {
        Self::first(default_page_size())
    }
}

/// Default page size as a non-zero value.
pub fn default_page_size() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN)
}

/// Loaded page with links to its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absent iff this is the first page
    pub prev_cursor: Option<Cursor>,
    /// Absent iff `items` is empty
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Builds the page delivered for `cursor`, deriving both neighbour links.
    pub fn for_cursor(cursor: Cursor, items: Vec<T>) -> Self {
        let next_cursor = if items.is_empty() {
            None
        } else {
            Some(cursor.next())
        };
        Self {
            items,
            prev_cursor: cursor.previous(),
            next_cursor,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.next_cursor.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Loaded pages plus the item position the consumer is anchored at.
#[derive(Debug, Clone)]
pub struct PagingState<'a, T> {
    pub pages: &'a [Page<T>],
    pub anchor_position: Option<usize>,
}

impl<'a, T> PagingState<'a, T> {
    pub fn new(pages: &'a [Page<T>], anchor_position: Option<usize>) -> Self {
        Self {
            pages,
            anchor_position,
        }
    }

    /// Page containing the item at `position`.
    ///
    /// Positions past the last loaded item resolve to the last page.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&'a Page<T>> {
        let mut start = 0;
        for page in self.pages {
            let end = start + page.items.len();
            if position < end {
                return Some(page);
            }
            start = end;
        }
        self.pages.last()
    }
}

/// Failure attached to the page boundary that was being loaded.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Failed to load {}: {source}", .request.resolved_cursor())]
pub struct PageLoadError {
    /// Request to reissue on retry
    pub request: LoadRequest,
    #[source]
    pub source: CatalogError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_links() {
        let page = Page::for_cursor(Cursor::FIRST, vec![1; 20]);
        assert_eq!(page.prev_cursor, None);
        assert_eq!(page.next_cursor, Cursor::new(2));
    }

    #[test]
    fn test_empty_page_ends_stream() {
        let first = Page::<u8>::for_cursor(Cursor::FIRST, vec![]);
        assert_eq!(first.prev_cursor, None);
        assert_eq!(first.next_cursor, None);

        let later = Page::<u8>::for_cursor(Cursor::new(5).unwrap(), vec![]);
        assert_eq!(later.prev_cursor, Cursor::new(4));
        assert!(later.is_end_of_stream());
    }

    #[test]
    fn test_short_page_is_not_terminal() {
        let page = Page::for_cursor(Cursor::new(3).unwrap(), vec![1, 2]);
        assert_eq!(page.next_cursor, Cursor::new(4));
    }

    #[test]
    fn test_cursor_rejects_zero() {
        assert_eq!(Cursor::new(0), None);
        assert_eq!(Cursor::FIRST.previous(), None);
        assert_eq!(Cursor::FIRST.next().page(), 2);
    }

    #[test]
    fn test_closest_page_to_position() {
        let pages = vec![
            Page::for_cursor(Cursor::FIRST, vec![0; 3]),
            Page::for_cursor(Cursor::new(2).unwrap(), vec![0; 2]),
        ];
        let state = PagingState::new(&pages, None);
        assert_eq!(state.closest_page_to_position(0).unwrap().prev_cursor, None);
        assert_eq!(
            state.closest_page_to_position(3).unwrap().prev_cursor,
            Some(Cursor::FIRST)
        );
        assert_eq!(
            state.closest_page_to_position(99).unwrap().prev_cursor,
            Some(Cursor::FIRST)
        );

        let none: Vec<Page<u8>> = Vec::new();
        assert!(PagingState::new(&none, Some(0)).closest_page_to_position(0).is_none());
    }

    #[test]
    fn test_load_error_message_names_page() {
        let error = PageLoadError {
            request: LoadRequest::at(Cursor::new(2).unwrap(), default_page_size()),
            source: CatalogError::Transport {
                reason: "reset".to_string(),
            },
        };
        assert_eq!(error.to_string(), "Failed to load page 2: Transport error: reset");
    }
}
