//! Debounced place search for a single input field
//!
//! Each keystroke replaces the field's query. A lookup is issued only after
//! the query has stayed unchanged for the quiescence window; any newer query
//! cancels the pending timer. Every query change bumps a generation counter,
//! and a lookup result is applied only while its generation is still current.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::GeocodeCandidate;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ports::GeocodingPort;

/// Timing and size limits of a [`DebouncedSearch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// How long the query must stay unchanged before it is looked up
    pub quiet_period: Duration,
    /// Result-count cap passed to the geocoder
    pub max_results: usize,
    /// Shorter trimmed queries clear the results instead of searching
    pub min_query_chars: usize,
}

impl SearchSettings {
    pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(400);
    pub const DEFAULT_MAX_RESULTS: usize = 5;
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            quiet_period: Self::DEFAULT_QUIET_PERIOD,
            max_results: Self::DEFAULT_MAX_RESULTS,
            min_query_chars: 1,
        }
    }
}

/// Observable state of a search field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Trimmed query currently owning the field
    pub query: String,
    /// Candidates from the latest applied lookup
    pub results: Vec<GeocodeCandidate>,
    /// A lookup for `query` is in flight
    pub is_loading: bool,
    /// A lookup for `query` is waiting for the quiescence window
    pub is_scheduled: bool,
    /// Message of the latest failed lookup, cleared by the next success
    pub last_error: Option<String>,
    generation: u64,
}

impl SearchSnapshot {
    /// Whether no lookup is pending or running
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.is_loading && !self.is_scheduled
    }
}

/// Debounced, cancellable geocoding search bound to one field
///
/// Must be used from within a Tokio runtime.
pub struct DebouncedSearch {
    geocoder: Arc<dyn GeocodingPort>,
    settings: SearchSettings,
    state: Arc<watch::Sender<SearchSnapshot>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for DebouncedSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedSearch")
            .field("settings", &self.settings)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl DebouncedSearch {
    /// Create an idle search field
    pub fn new(geocoder: Arc<dyn GeocodingPort>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            geocoder,
            settings,
            state: Arc::new(state),
            pending: Mutex::new(None),
        }
    }

    /// Settings this field was created with
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Replace the field's query
    ///
    /// An unchanged trimmed query is ignored. A query shorter than
    /// `min_query_chars` clears the results at once; any other query
    /// schedules a lookup after the quiescence window.
    pub fn update_query(&self, text: &str) {
        let query = text.trim();
        let searchable = query.chars().count() >= self.settings.min_query_chars.max(1);

        let mut pending = self.pending.lock();
        let mut generation = None;
        self.state.send_if_modified(|s| {
            if s.query == query {
                return false;
            }
            s.generation += 1;
            s.query = query.to_string();
            s.is_loading = false;
            s.is_scheduled = searchable;
            if !searchable {
                s.results.clear();
                s.last_error = None;
            }
            generation = Some(s.generation);
            true
        });

        let Some(generation) = generation else {
            return;
        };
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        if searchable {
            debug!(%query, generation, "Scheduling place search");
            *pending = Some(self.schedule(query.to_string(), generation));
        }
    }

    /// Close the candidate list
    ///
    /// Cancels the pending timer, invalidates any in-flight lookup and
    /// clears the query so that retyping the same text searches again.
    pub fn dismiss(&self) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        self.state.send_modify(|s| {
            s.generation += 1;
            s.query.clear();
            s.results.clear();
            s.is_loading = false;
            s.is_scheduled = false;
            s.last_error = None;
        });
    }

    /// Current state of the field
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Candidates from the latest applied lookup
    pub fn results(&self) -> Vec<GeocodeCandidate> {
        self.state.borrow().results.clone()
    }

    /// Receive every state change of the field
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    /// Wait until no lookup is pending or running
    pub async fn settled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns once idle
        let _ = rx.wait_for(SearchSnapshot::is_idle).await;
    }

    fn schedule(&self, query: String, generation: u64) -> JoinHandle<()> {
        let geocoder = Arc::clone(&self.geocoder);
        let state = Arc::clone(&self.state);
        let quiet_period = self.settings.quiet_period;
        let limit = self.settings.max_results;

        tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            run_lookup(geocoder.as_ref(), &state, &query, generation, limit).await;
        })
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_lookup(
    geocoder: &dyn GeocodingPort,
    state: &watch::Sender<SearchSnapshot>,
    query: &str,
    generation: u64,
    limit: usize,
) {
    let started = state.send_if_modified(|s| {
        if s.generation != generation {
            return false;
        }
        s.is_scheduled = false;
        s.is_loading = true;
        true
    });
    if !started {
        return;
    }

    let outcome = geocoder.search(query, limit).await;

    state.send_if_modified(|s| {
        if s.generation != generation {
            debug!(%query, generation, current = s.generation, "Discarding stale search result");
            return false;
        }
        s.is_loading = false;
        match outcome {
            Ok(mut results) => {
                results.truncate(limit);
                debug!(%query, count = results.len(), "Search results applied");
                s.results = results;
                s.last_error = None;
            },
            Err(e) => {
                warn!(%query, error = %e, "Place search failed, keeping previous results");
                s.last_error = Some(e.to_string());
            },
        }
        true
    });
}
