//! Food Search State
//!
//! Front-end neutral pieces of the debounced search: input classification
//! and a sequence guard so a slow response for an old query can never
//! overwrite results for a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::types::FoodRecord;

/// Quiet period after the last keystroke before a search is sent
pub const DEBOUNCE_MS: u64 = 250;

/// Shorter (trimmed) queries clear results without a request
pub const MIN_QUERY_CHARS: usize = 2;

/// Page size requested by the search dialog
pub const SEARCH_PAGE_SIZE: u32 = 25;

/// Whether a raw input is long enough to search for
pub fn searchable(raw: &str, min_chars: usize) -> Option<&str> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= min_chars).then_some(trimmed)
}

/// Issues sequence numbers and tells which one is current
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

/// What to do with one input change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Too short: drop results, send nothing
    Clear,
    /// Send `query`; apply the response only if `seq` is still current
    Query { seq: u64, query: String },
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify an input change. Every call supersedes earlier ones,
    /// including clears.
    pub fn next(&self, raw: &str, min_chars: usize) -> SearchInput {
        let seq = self.bump();
        match searchable(raw, min_chars) {
            Some(query) => SearchInput::Query {
                seq,
                query: query.to_string(),
            },
            None => SearchInput::Clear,
        }
    }

    /// Invalidate everything in flight
    pub fn bump(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}

/// Observable search state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub items: Vec<FoodRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    /// Results cleared for a too-short query
    pub fn cleared(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// True when a search ran and found nothing
    pub fn is_empty_result(&self, min_chars: usize) -> bool {
        !self.loading
            && self.error.is_none()
            && self.items.is_empty()
            && searchable(&self.query, min_chars).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_queries_clear() {
        let seq = SearchSequencer::new();
        assert_eq!(seq.next("", MIN_QUERY_CHARS), SearchInput::Clear);
        assert_eq!(seq.next("  s  ", MIN_QUERY_CHARS), SearchInput::Clear);
        assert_eq!(
            seq.next(" sk ", MIN_QUERY_CHARS),
            SearchInput::Query {
                seq: 3,
                query: "sk".to_string()
            }
        );
    }

    #[test]
    fn test_only_latest_sequence_is_current() {
        let seq = SearchSequencer::new();
        let SearchInput::Query { seq: first, .. } = seq.next("chi", 2) else {
            panic!("expected query");
        };
        let SearchInput::Query { seq: second, .. } = seq.next("chicken", 2) else {
            panic!("expected query");
        };

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_clear_invalidates_in_flight_query() {
        let seq = SearchSequencer::new();
        let SearchInput::Query { seq: pending, .. } = seq.next("rice", 2) else {
            panic!("expected query");
        };
        assert_eq!(seq.next("r", 2), SearchInput::Clear);
        assert!(!seq.is_current(pending));
    }

    #[test]
    fn test_empty_result_detection() {
        let mut state = SearchState::cleared("zzqx");
        assert!(state.is_empty_result(MIN_QUERY_CHARS));

        state.loading = true;
        assert!(!state.is_empty_result(MIN_QUERY_CHARS));

        assert!(!SearchState::cleared("z").is_empty_result(MIN_QUERY_CHARS));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(searchable("é", 2), None);
        assert_eq!(searchable("ét", 2), Some("ét"));
    }
}
