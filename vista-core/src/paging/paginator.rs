//! Page loader over a [`PageSource`].

use std::sync::Arc;

use super::{Cursor, LoadRequest, Page, PageLoadError, PageSource, PagingState};
use crate::query::Query;

/// Cursor-based loader for one feed.
///
/// Stateless apart from its source: every call maps one [`LoadRequest`] to one
/// [`Page`] or [`PageLoadError`], so reissuing a failed request is idempotent.
#[derive(Debug)]
pub struct Paginator<S: PageSource> {
    source: Arc<S>,
}

impl<S: PageSource> Clone for Paginator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads the page addressed by `request` for `query`.
    ///
    /// The returned page links back to the previous page unless it is the
    /// first, and forward to the next page unless it came back empty.
    ///
    /// # Errors
    /// - `PageLoadError` - Transport, server or decode failure for this page;
    ///   carries the request so the caller can retry it unchanged
    pub async fn load(
        &self,
        query: &Query,
        request: LoadRequest,
    ) -> Result<Page<S::Item>, PageLoadError> {
        let cursor = request.resolved_cursor();
        let per_page = request.page_size.get();

        tracing::debug!(
            kind = %self.source.kind(),
            %query,
            page = cursor.page(),
            per_page,
            "Loading page"
        );

        match self.source.fetch_page(query, cursor.page(), per_page).await {
            Ok(remote) => {
                let page = Page::for_cursor(cursor, remote.items);
                tracing::debug!(
                    kind = %self.source.kind(),
                    page = cursor.page(),
                    items = page.len(),
                    total_results = remote.total_results,
                    end_of_stream = page.is_end_of_stream(),
                    "Loaded page"
                );
                Ok(page)
            }
            Err(source) => {
                tracing::warn!(
                    kind = %self.source.kind(),
                    %query,
                    page = cursor.page(),
                    error = %source,
                    "Page load failed"
                );
                Err(PageLoadError { request, source })
            }
        }
    }

    /// Resolves the cursor to reload from after a full stream restart.
    ///
    /// Uses the page closest to the anchor: its previous cursor plus one, else
    /// its next cursor minus one. `None` means start from the first page.
    pub fn refresh_key(&self, state: &PagingState<'_, S::Item>) -> Option<Cursor> {
        resolve_refresh_key(state)
    }
}

/// Refresh key resolution shared by every paginator.
pub fn resolve_refresh_key<T>(state: &PagingState<'_, T>) -> Option<Cursor> {
    let anchor = state.anchor_position?;
    let page = state.closest_page_to_position(anchor)?;
    page.prev_cursor
        .map(Cursor::next)
        .or_else(|| page.next_cursor.and_then(Cursor::previous))
}
