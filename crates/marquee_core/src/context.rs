//! Process-wide wiring of the data layer.
//!
//! # Invariants
//! - Construction order is fixed: session store, poster lookup, gateway,
//!   then repositories. Every repository shares the same store.
//! - No lazy globals in core; hosts own the `AppContext` value.

use crate::api::poster::{PosterLookup, PosterLookupError, TmdbPosterLookup};
use crate::api::{ApiError, ApiGateway, HttpGateway};
use crate::config::ClientConfig;
use crate::controller::admin::{AddMovieController, AdminController};
use crate::controller::auth::{ForgotPasswordController, LoginController, RegisterController};
use crate::controller::catalog::CatalogController;
use crate::controller::detail::MovieDetailController;
use crate::controller::profile::ProfileController;
use crate::db::{open_db, DbError};
use crate::media::{ImageEncoder, SniffingImageEncoder};
use crate::repo::admin_repo::AdminRepository;
use crate::repo::auth_repo::AuthRepository;
use crate::repo::movie_repo::MovieRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::session::{SessionError, SessionStore, SqliteSessionStore};
use log::info;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("gateway setup failed: {0}")]
    Gateway(#[from] ApiError),
    #[error("poster lookup setup failed: {0}")]
    Poster(#[from] PosterLookupError),
}

/// Shared handles for one signed-in (or signed-out) client.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn SessionStore>,
    posters: Arc<dyn PosterLookup>,
    encoder: Arc<dyn ImageEncoder>,
    auth: Arc<AuthRepository>,
    movies: Arc<MovieRepository>,
    profiles: Arc<ProfileRepository>,
    admin: Arc<AdminRepository>,
}

impl AppContext {
    /// Opens the session database at `db_path` and builds the HTTP stack.
    pub fn init(config: ClientConfig, db_path: impl AsRef<Path>) -> Result<Self, ContextError> {
        let store: Arc<dyn SessionStore> =
            Arc::new(SqliteSessionStore::new(open_db(db_path)?)?);
        let posters: Arc<dyn PosterLookup> = Arc::new(TmdbPosterLookup::new(&config)?);
        let gateway: Arc<dyn ApiGateway> = Arc::new(HttpGateway::new(config)?);
        info!("event=context_init module=core status=ok");
        Ok(Self::from_parts(store, gateway, posters))
    }

    /// Wires repositories over caller-supplied collaborators.
    pub fn from_parts(
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn ApiGateway>,
        posters: Arc<dyn PosterLookup>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthRepository::new(Arc::clone(&gateway), Arc::clone(&store))),
            movies: Arc::new(MovieRepository::new(Arc::clone(&gateway), Arc::clone(&store))),
            profiles: Arc::new(ProfileRepository::new(Arc::clone(&gateway), Arc::clone(&store))),
            admin: Arc::new(AdminRepository::new(gateway, Arc::clone(&store))),
            encoder: Arc::new(SniffingImageEncoder),
            posters,
            store,
        }
    }

    pub fn with_image_encoder(mut self, encoder: Arc<dyn ImageEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    pub fn auth_repository(&self) -> Arc<AuthRepository> {
        Arc::clone(&self.auth)
    }

    pub fn movie_repository(&self) -> Arc<MovieRepository> {
        Arc::clone(&self.movies)
    }

    pub fn profile_repository(&self) -> Arc<ProfileRepository> {
        Arc::clone(&self.profiles)
    }

    pub fn admin_repository(&self) -> Arc<AdminRepository> {
        Arc::clone(&self.admin)
    }

    pub fn login_controller(&self) -> LoginController {
        LoginController::new(self.auth_repository(), self.session_store())
    }

    pub fn register_controller(&self) -> RegisterController {
        RegisterController::new(self.auth_repository(), self.session_store())
    }

    pub fn forgot_password_controller(&self) -> ForgotPasswordController {
        ForgotPasswordController::new(self.auth_repository())
    }

    /// Screen controllers below start their initial load on the current
    /// tokio runtime.
    pub fn catalog_controller(&self) -> Arc<CatalogController> {
        CatalogController::launch(self.movie_repository(), self.session_store())
    }

    pub fn movie_detail_controller(
        &self,
        movie_id: impl Into<String>,
    ) -> Arc<MovieDetailController> {
        MovieDetailController::launch(movie_id, self.movie_repository(), Arc::clone(&self.posters))
    }

    pub fn profile_controller(&self) -> Arc<ProfileController> {
        ProfileController::launch(self.profile_repository(), Arc::clone(&self.encoder))
    }

    pub fn admin_controller(&self) -> Arc<AdminController> {
        AdminController::launch(self.admin_repository(), self.session_store())
    }

    pub fn add_movie_controller(&self) -> AddMovieController {
        AddMovieController::new(self.admin_repository())
    }
}
