//! Debounced Food Search
//!
//! Native counterpart of the search dialog. Each input restarts a single
//! timer task; when it fires, the request runs as its own detached task so a
//! later keystroke never aborts a request already on the wire. The
//! [`SearchSequencer`] decides whether a finished response may still be
//! applied. State is published through a `tokio::sync::watch` channel.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::types::FoodRecord;
use crate::api::{ApiClient, HttpTransport};
use crate::error::ClientResult;
use crate::search::{SearchInput, SearchSequencer, SearchState, DEBOUNCE_MS, MIN_QUERY_CHARS, SEARCH_PAGE_SIZE};
use crate::store::KeyValueStore;

/// Anything that can answer a food search
#[async_trait]
pub trait FoodSearch: Send + Sync + 'static {
    async fn search(&self, query: &str, limit: u32) -> ClientResult<Vec<FoodRecord>>;
}

#[async_trait]
impl<T, S> FoodSearch for ApiClient<T, S>
where
    T: HttpTransport + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    async fn search(&self, query: &str, limit: u32) -> ClientResult<Vec<FoodRecord>> {
        Ok(self.search_foods(query, Some(limit), None).await?.items)
    }
}

/// Search tuning
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_chars: usize,
    pub limit: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            min_chars: MIN_QUERY_CHARS,
            limit: SEARCH_PAGE_SIZE,
        }
    }
}

/// Debounces raw input into food searches
pub struct DebouncedSearch<F> {
    searcher: Arc<F>,
    sequencer: Arc<SearchSequencer>,
    state: Arc<watch::Sender<SearchState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    options: SearchOptions,
}

impl<F: FoodSearch> DebouncedSearch<F> {
    pub fn new(searcher: F, options: SearchOptions) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            searcher: Arc::new(searcher),
            sequencer: Arc::new(SearchSequencer::new()),
            state: Arc::new(state),
            pending: Mutex::new(None),
            options,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Latest published state
    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Feed one input change. Must be called inside a tokio runtime.
    pub fn input(&self, raw: &str) {
        self.cancel_pending();

        match self.sequencer.next(raw, self.options.min_chars) {
            SearchInput::Clear => {
                self.state.send_replace(SearchState::cleared(raw));
            }
            SearchInput::Query { seq, query } => {
                self.state.send_modify(|s| {
                    s.query = raw.to_string();
                    s.error = None;
                });

                let searcher = Arc::clone(&self.searcher);
                let sequencer = Arc::clone(&self.sequencer);
                let state = Arc::clone(&self.state);
                let delay = self.options.debounce;
                let limit = self.options.limit;

                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    tokio::spawn(run_search(searcher, sequencer, state, seq, query, limit));
                });

                if let Ok(mut pending) = self.pending.lock() {
                    *pending = Some(timer);
                }
            }
        }
    }
}

impl<F> DebouncedSearch<F> {
    /// Drop the pending timer, if any. In-flight requests keep running.
    pub fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(timer) = pending.take() {
                timer.abort();
            }
        }
    }
}

impl<F> Drop for DebouncedSearch<F> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

async fn run_search<F: FoodSearch>(
    searcher: Arc<F>,
    sequencer: Arc<SearchSequencer>,
    state: Arc<watch::Sender<SearchState>>,
    seq: u64,
    query: String,
    limit: u32,
) {
    let started = state.send_if_modified(|s| {
        if !sequencer.is_current(seq) {
            return false;
        }
        s.loading = true;
        s.error = None;
        true
    });
    if !started {
        return;
    }

    tracing::debug!(seq, query = %query, "Searching foods");
    let result = searcher.search(&query, limit).await;

    let applied = state.send_if_modified(|s| {
        if !sequencer.is_current(seq) {
            return false;
        }
        s.loading = false;
        match result {
            Ok(items) => {
                s.items = items;
                s.error = None;
            }
            Err(e) => {
                s.error = Some(e.to_string());
            }
        }
        true
    });

    if !applied {
        tracing::debug!(seq, query = %query, "Dropped stale search response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::FoodSource;
    use crate::error::ClientError;

    /// Records queries; "slow" queries take a second, everything else 10 ms
    #[derive(Default)]
    struct FakeSearch {
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl FoodSearch for FakeSearch {
        async fn search(&self, query: &str, _limit: u32) -> ClientResult<Vec<FoodRecord>> {
            self.calls.lock().unwrap().push(query.to_string());
            let delay = if query.starts_with("slow") { 1000 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if query == "boom" {
                return Err(ClientError::Network("offline".to_string()));
            }
            Ok(vec![FoodRecord::new(query, FoodSource::Custom, query)])
        }
    }

    fn debounced() -> (DebouncedSearch<FakeSearch>, Arc<Mutex<Vec<String>>>) {
        let fake = FakeSearch::default();
        let calls = Arc::clone(&fake.calls);
        (DebouncedSearch::new(fake, SearchOptions::default()), calls)
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn names(state: &SearchState) -> Vec<String> {
        state.items.iter().map(|f| f.name.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_sends_one_request() {
        let (search, calls) = debounced();

        search.input("c");
        wait(50).await;
        search.input("ch");
        wait(100).await;
        search.input("chi");
        wait(300).await;

        assert_eq!(*calls.lock().unwrap(), vec!["chi".to_string()]);
        let state = search.current();
        assert_eq!(names(&state), vec!["chi"]);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_clears_without_request() {
        let (search, calls) = debounced();

        search.input("rice");
        wait(300).await;
        assert_eq!(names(&search.current()), vec!["rice"]);

        search.input(" r ");
        wait(300).await;

        assert_eq!(calls.lock().unwrap().len(), 1);
        let state = search.current();
        assert!(state.items.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let (search, calls) = debounced();
        let mut rx = search.subscribe();

        search.input("slow query");
        wait(300).await;
        assert!(search.current().loading);

        search.input("fast query");
        wait(300).await;
        assert_eq!(names(&search.current()), vec!["fast query"]);

        // Let the slow request finish
        wait(1500).await;

        assert_eq!(calls.lock().unwrap().len(), 2);
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.query, "fast query");
        assert_eq!(names(&state), vec!["fast query"]);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_in_flight_results() {
        let (search, _calls) = debounced();

        search.input("slow rice");
        wait(300).await;
        search.input("");
        wait(1500).await;

        let state = search.current();
        assert!(state.items.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_is_published() {
        let (search, _calls) = debounced();

        search.input("boom");
        wait(300).await;

        let state = search.current();
        assert_eq!(state.error.as_deref(), Some("Network error: offline"));
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let (search, calls) = debounced();

        search.input("oats");
        drop(search);
        wait(500).await;

        assert!(calls.lock().unwrap().is_empty());
    }
}
