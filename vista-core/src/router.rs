//! Query routing for a single feed with latest-query-wins semantics.
//!
//! Each restart bumps a generation counter. Loads are tagged with the
//! generation they were issued under and only publish while it is still
//! current, so a superseded query can never deliver a page after its
//! successor started.

use std::num::NonZeroU32;
use std::sync::Arc;

use futures::stream::BoxStream;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::PagingConfig;
use crate::paging::{
    Cursor, LoadRequest, Page, PageLoadError, PageSource, Paginator, PagingState,
};
use crate::query::Query;
use crate::reactive::watch_stream;

/// Load status of a feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    /// No query set
    Idle,
    /// A page request is in flight
    Loading,
    /// Pages loaded and more may follow
    Ready,
    /// Last page came back empty
    Exhausted,
    /// Last request failed; previously loaded pages stay valid
    Failed(PageLoadError),
}

/// Everything a consumer of one feed renders.
#[derive(Debug, Clone)]
pub struct FeedSnapshot<T> {
    /// Active query, `None` while idle
    pub query: Option<Query>,
    /// Restart counter the pages belong to
    pub generation: u64,
    /// Pages in request order
    pub pages: Vec<Page<T>>,
    pub status: FeedStatus,
}

impl<T> FeedSnapshot<T> {
    fn idle(generation: u64) -> Self {
        Self {
            query: None,
            generation,
            pages: Vec::new(),
            status: FeedStatus::Idle,
        }
    }

    /// First snapshot of a new generation. A restart with a query is already
    /// loading its first page, so it never shows up as idle.
    fn restarted(generation: u64, query: Option<Query>) -> Self {
        let status = if query.is_some() {
            FeedStatus::Loading
        } else {
            FeedStatus::Idle
        };
        Self {
            query,
            generation,
            pages: Vec::new(),
            status,
        }
    }

    /// All loaded items in display order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }

    pub fn error(&self) -> Option<&PageLoadError> {
        match &self.status {
            FeedStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

struct RouterState {
    query: Option<Query>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

struct Shared<T> {
    state: Mutex<RouterState>,
    snapshot: watch::Sender<FeedSnapshot<T>>,
}

impl<T> Shared<T> {
    /// Publishes a load result if its generation is still current.
    fn publish(&self, generation: u64, result: Result<Page<T>, PageLoadError>) {
        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "Discarding result of superseded load"
            );
            return;
        }
        state.in_flight = None;

        self.snapshot.send_modify(|snapshot| match result {
            Ok(page) => {
                snapshot.status = if page.is_end_of_stream() {
                    FeedStatus::Exhausted
                } else {
                    FeedStatus::Ready
                };
                snapshot.pages.push(page);
            }
            Err(error) => snapshot.status = FeedStatus::Failed(error),
        });
    }
}

/// Owns the live query of one feed and streams its pages.
///
/// Loads run on the Tokio runtime, so mutating methods must be called from
/// within a runtime context. Dropping the router cancels its in-flight load.
pub struct QueryRouter<S: PageSource> {
    paginator: Paginator<S>,
    page_size: NonZeroU32,
    prefetch_distance: usize,
    shared: Arc<Shared<S::Item>>,
}

impl<S> QueryRouter<S>
where
    S: PageSource + 'static,
{
    /// Creates an idle router over `paginator`.
    pub fn new(paginator: Paginator<S>, config: &PagingConfig) -> Self {
        let (snapshot, _) = watch::channel(FeedSnapshot::idle(0));
        Self {
            paginator,
            page_size: config.page_size,
            prefetch_distance: config.prefetch_distance,
            shared: Arc::new(Shared {
                state: Mutex::new(RouterState {
                    query: None,
                    generation: 0,
                    in_flight: None,
                }),
                snapshot,
            }),
        }
    }

    /// Switches the feed to `query`.
    ///
    /// Does nothing when `query` equals the active one. Otherwise cancels the
    /// in-flight load, drops all buffered pages and starts from the first page.
    /// Returns whether the stream restarted.
    pub fn set_query(&self, query: Query) -> bool {
        let mut state = self.shared.state.lock();
        if state.query.as_ref() == Some(&query) {
            tracing::trace!(%query, "Query unchanged, keeping stream");
            return false;
        }
        tracing::debug!(
            kind = %self.paginator.source().kind(),
            %query,
            "Restarting feed for new query"
        );
        self.restart(&mut state, Some(query), None);
        true
    }

    /// Returns the feed to idle, cancelling any load and dropping pages.
    pub fn clear(&self) -> bool {
        let mut state = self.shared.state.lock();
        if state.query.is_none() {
            return false;
        }
        tracing::debug!(kind = %self.paginator.source().kind(), "Feed cleared");
        self.restart(&mut state, None, None);
        true
    }

    /// Requests the page after the last loaded one.
    ///
    /// No-op while idle, while a load is in flight, after the stream ended, or
    /// after a failure (use [`QueryRouter::retry`]). Returns whether a load
    /// was issued.
    pub fn load_next(&self) -> bool {
        let mut state = self.shared.state.lock();
        let Some(query) = state.query.clone() else {
            return false;
        };
        if state.in_flight.is_some() {
            return false;
        }

        let next = {
            let snapshot = self.shared.snapshot.borrow();
            match (&snapshot.status, snapshot.pages.last()) {
                (FeedStatus::Failed(_) | FeedStatus::Exhausted, _) => None,
                (_, Some(last)) => last.next_cursor,
                (_, None) => Some(Cursor::FIRST),
            }
        };

        match next {
            Some(cursor) => {
                let request = LoadRequest::at(cursor, self.page_size);
                self.spawn_load(&mut state, query, request);
                true
            }
            None => false,
        }
    }

    /// Reissues the request that failed, unchanged.
    pub fn retry(&self) -> bool {
        let mut state = self.shared.state.lock();
        let Some(query) = state.query.clone() else {
            return false;
        };
        if state.in_flight.is_some() {
            return false;
        }
        let failed = self.shared.snapshot.borrow().error().map(|error| error.request);
        match failed {
            Some(request) => {
                tracing::debug!(page = request.resolved_cursor().page(), "Retrying page load");
                self.spawn_load(&mut state, query, request);
                true
            }
            None => false,
        }
    }

    /// Hint that the item at `position` became visible.
    ///
    /// Loads the next page once the consumer is within the prefetch distance
    /// of the end of the loaded items. Returns whether a load was issued.
    pub fn access_hint(&self, position: usize) -> bool {
        let loaded = self.shared.snapshot.borrow().item_count();
        if position.saturating_add(self.prefetch_distance) < loaded {
            return false;
        }
        self.load_next()
    }

    /// Restarts the active query around `anchor_position`.
    ///
    /// The reload cursor comes from the page closest to the anchor, so the
    /// consumer keeps its place instead of jumping back to the first page.
    pub fn refresh(&self, anchor_position: Option<usize>) -> bool {
        let mut state = self.shared.state.lock();
        let Some(query) = state.query.clone() else {
            return false;
        };
        let start = {
            let snapshot = self.shared.snapshot.borrow();
            let paging = PagingState::new(&snapshot.pages, anchor_position);
            self.paginator.refresh_key(&paging)
        };
        tracing::debug!(
            %query,
            start = start.map(Cursor::page).unwrap_or(1),
            "Refreshing feed"
        );
        self.restart(&mut state, Some(query), start);
        true
    }

    /// Active query, if any.
    pub fn query(&self) -> Option<Query> {
        self.shared.state.lock().query.clone()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> FeedSnapshot<S::Item> {
        self.shared.snapshot.borrow().clone()
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot<S::Item>> {
        self.shared.snapshot.subscribe()
    }

    /// Stream of snapshots, starting with the current one.
    pub fn updates(&self) -> BoxStream<'static, FeedSnapshot<S::Item>> {
        watch_stream(self.subscribe())
    }

    fn restart(&self, state: &mut RouterState, query: Option<Query>, start: Option<Cursor>) {
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }
        state.generation += 1;
        state.query = query.clone();

        self.shared
            .snapshot
            .send_replace(FeedSnapshot::restarted(state.generation, query.clone()));

        if let Some(query) = query {
            let request = LoadRequest {
                cursor: start,
                page_size: self.page_size,
            };
            self.spawn_load(state, query, request);
        }
    }

    fn spawn_load(&self, state: &mut RouterState, query: Query, request: LoadRequest) {
        let generation = state.generation;
        let paginator = self.paginator.clone();
        let shared = Arc::clone(&self.shared);

        self.shared.snapshot.send_if_modified(|snapshot| {
            if snapshot.is_loading() {
                return false;
            }
            snapshot.status = FeedStatus::Loading;
            true
        });

        state.in_flight = Some(tokio::spawn(async move {
            let result = paginator.load(&query, request).await;
            shared.publish(generation, result);
        }));
    }
}

impl<S: PageSource> Drop for QueryRouter<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.shared.state.lock().in_flight.take() {
            handle.abort();
        }
    }
}

impl<S: PageSource> std::fmt::Debug for QueryRouter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("QueryRouter")
            .field("query", &state.query)
            .field("generation", &state.generation)
            .field("loading", &state.in_flight.is_some())
            .finish()
    }
}
