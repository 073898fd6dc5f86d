//! Movie detail with best-effort poster enrichment.
//!
//! # Invariants
//! - The movie id is fixed for the controller lifetime.
//! - Primary fetch failure publishes `Error` without consulting posters.
//! - Poster lookup failures never turn a successful fetch into `Error`.

use super::{RequestState, StateCell};
use crate::api::poster::PosterLookup;
use crate::model::movie::Movie;
use crate::repo::movie_repo::MovieRepository;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;

pub struct MovieDetailController {
    movie_id: String,
    movies: Arc<MovieRepository>,
    posters: Arc<dyn PosterLookup>,
    state: StateCell<Movie>,
}

impl MovieDetailController {
    pub fn new(
        movie_id: impl Into<String>,
        movies: Arc<MovieRepository>,
        posters: Arc<dyn PosterLookup>,
    ) -> Self {
        Self {
            movie_id: movie_id.into(),
            movies,
            posters,
            state: StateCell::new(RequestState::Loading),
        }
    }

    /// Creates the controller and starts loading on the current tokio runtime.
    pub fn launch(
        movie_id: impl Into<String>,
        movies: Arc<MovieRepository>,
        posters: Arc<dyn PosterLookup>,
    ) -> Arc<Self> {
        let controller = Arc::new(Self::new(movie_id, movies, posters));
        let task = Arc::clone(&controller);
        tokio::spawn(async move { task.load().await });
        controller
    }

    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    pub fn state(&self) -> RequestState<Movie> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<Movie>> {
        self.state.subscribe()
    }

    pub async fn load(&self) {
        let ticket = self.state.begin();
        let next = match self.movies.movie_by_id(&self.movie_id).await {
            Ok(movie) => RequestState::Success(self.enrich(movie).await),
            Err(err) => {
                warn!("event=movie_detail module=controller status=error error={err}");
                RequestState::Error(err.user_message())
            }
        };
        self.state.finish(ticket, next);
    }

    async fn enrich(&self, movie: Movie) -> Movie {
        match self.posters.find_poster(&movie.title).await {
            Ok(Some(url)) => movie.with_poster(url),
            Ok(None) => {
                debug!("event=poster_lookup module=controller status=miss");
                movie
            }
            Err(err) => {
                warn!("event=poster_lookup module=controller status=skipped error={err}");
                movie
            }
        }
    }
}
