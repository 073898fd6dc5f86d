//! Home screen catalog: movie list, live search filter, logout.
//!
//! # Invariants
//! - `filtered` is empty unless the list fetch is in `Success`.
//! - A blank query shows the full fetched list in fetch order.
//! - `filtered` is recomputed synchronously whenever the fetch state or the
//!   query changes, from the latest value of both.

use super::{RequestState, StateCell};
use crate::model::movie::Movie;
use crate::repo::movie_repo::MovieRepository;
use crate::session::{FieldStream, SessionResult, SessionStore};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub struct CatalogController {
    movies: Arc<MovieRepository>,
    store: Arc<dyn SessionStore>,
    state: StateCell<Vec<Movie>>,
    query: watch::Sender<String>,
    filtered: watch::Sender<Vec<Movie>>,
    // Serializes "change an input, then recompute" pairs.
    derive_lock: Mutex<()>,
}

impl CatalogController {
    /// Creates the controller in `Loading` without fetching.
    pub fn new(movies: Arc<MovieRepository>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            movies,
            store,
            state: StateCell::new(RequestState::Loading),
            query: watch::channel(String::new()).0,
            filtered: watch::channel(Vec::new()).0,
            derive_lock: Mutex::new(()),
        }
    }

    /// Creates the controller and starts the initial fetch on the current
    /// tokio runtime.
    pub fn launch(movies: Arc<MovieRepository>, store: Arc<dyn SessionStore>) -> Arc<Self> {
        let controller = Arc::new(Self::new(movies, store));
        let task = Arc::clone(&controller);
        tokio::spawn(async move { task.refresh().await });
        controller
    }

    pub fn movie_state(&self) -> RequestState<Vec<Movie>> {
        self.state.get()
    }

    pub fn subscribe_movie_state(&self) -> watch::Receiver<RequestState<Vec<Movie>>> {
        self.state.subscribe()
    }

    pub fn search_query(&self) -> String {
        self.query.borrow().clone()
    }

    pub fn filtered(&self) -> Vec<Movie> {
        self.filtered.borrow().clone()
    }

    /// Live filtered view; observing it never triggers a fetch.
    pub fn subscribe_filtered(&self) -> watch::Receiver<Vec<Movie>> {
        self.filtered.subscribe()
    }

    pub fn role(&self) -> Option<String> {
        self.store.snapshot().role
    }

    pub fn observe_role(&self) -> FieldStream {
        self.store.observe_role()
    }

    pub fn on_search_query_change(&self, query: impl Into<String>) {
        let query = query.into();
        self.derive(|| {
            self.query.send_replace(query);
        });
    }

    /// Fetches the full movie list. The newest call wins.
    pub async fn refresh(&self) {
        let ticket = self.derive(|| self.state.begin());
        let next = match self.movies.movies().await {
            Ok(movies) => {
                info!(
                    "event=catalog_load module=controller status=ok count={}",
                    movies.len()
                );
                RequestState::Success(movies)
            }
            Err(err) => {
                warn!("event=catalog_load module=controller status=error error={err}");
                RequestState::Error(err.user_message())
            }
        };
        self.derive(|| {
            self.state.finish(ticket, next);
        });
    }

    /// Clears the stored session; the host navigates back to sign-in.
    pub fn logout(&self) -> SessionResult<()> {
        self.store.clear_session()?;
        info!("event=logout module=controller status=ok");
        Ok(())
    }

    fn derive<R>(&self, change: impl FnOnce() -> R) -> R {
        let _guard = self
            .derive_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let out = change();
        let next = filter_movies(&self.state.get(), &self.query.borrow());
        self.filtered.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        out
    }
}

/// Derives the visible list from a fetch state and a search query.
pub fn filter_movies(state: &RequestState<Vec<Movie>>, query: &str) -> Vec<Movie> {
    let Some(movies) = state.success() else {
        return Vec::new();
    };
    if query.trim().is_empty() {
        return movies.clone();
    }
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|movie| movie.matches_lowercase(&needle))
        .cloned()
        .collect()
}
