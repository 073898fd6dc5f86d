//! Admin dashboard (user list, role gate) and the add-movie form.

use super::form::{
    int_above, required, DIRECTOR_REQUIRED, GENRE_REQUIRED, INVALID_DURATION, INVALID_YEAR,
    MIN_RELEASE_YEAR_EXCLUSIVE, TITLE_REQUIRED,
};
use super::{RequestState, StateCell};
use crate::model::movie::{Movie, NewMovie};
use crate::model::user::{User, ADMIN_ROLE};
use crate::repo::admin_repo::AdminRepository;
use crate::session::{FieldStream, SessionStore};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;

pub struct AdminController {
    admin: Arc<AdminRepository>,
    store: Arc<dyn SessionStore>,
    users: StateCell<Vec<User>>,
}

impl AdminController {
    pub fn new(admin: Arc<AdminRepository>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            admin,
            store,
            users: StateCell::new(RequestState::Loading),
        }
    }

    /// Creates the controller and starts loading users on the current runtime.
    pub fn launch(admin: Arc<AdminRepository>, store: Arc<dyn SessionStore>) -> Arc<Self> {
        let controller = Arc::new(Self::new(admin, store));
        let task = Arc::clone(&controller);
        tokio::spawn(async move { task.fetch_all_users().await });
        controller
    }

    pub fn users_state(&self) -> RequestState<Vec<User>> {
        self.users.get()
    }

    pub fn subscribe_users_state(&self) -> watch::Receiver<RequestState<Vec<User>>> {
        self.users.subscribe()
    }

    pub fn role(&self) -> Option<String> {
        self.store.snapshot().role
    }

    pub fn observe_role(&self) -> FieldStream {
        self.store.observe_role()
    }

    /// Gate for admin-only actions such as "add movie".
    pub fn is_admin(&self) -> bool {
        self.role().as_deref() == Some(ADMIN_ROLE)
    }

    pub async fn fetch_all_users(&self) {
        let ticket = self.users.begin();
        let next = match self.admin.list_users().await {
            Ok(users) => RequestState::Success(users),
            Err(err) => {
                warn!("event=admin_users module=controller status=error error={err}");
                RequestState::Error(err.user_message())
            }
        };
        self.users.finish(ticket, next);
    }
}

/// Raw text input of the add-movie form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub director: String,
    pub year: String,
    pub duration: String,
    pub genre: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddMovieForm {
    pub draft: MovieDraft,
    pub title_error: Option<String>,
    pub director_error: Option<String>,
    pub year_error: Option<String>,
    pub duration_error: Option<String>,
    pub genre_error: Option<String>,
    pub is_valid: bool,
}

impl AddMovieForm {
    fn validate(&mut self) {
        let draft = &self.draft;
        self.title_error = required(&draft.title, TITLE_REQUIRED);
        self.director_error = required(&draft.director, DIRECTOR_REQUIRED);
        self.genre_error = required(&draft.genre, GENRE_REQUIRED);
        self.year_error = int_above(&draft.year, MIN_RELEASE_YEAR_EXCLUSIVE)
            .is_none()
            .then(|| INVALID_YEAR.to_string());
        self.duration_error = int_above(&draft.duration, 0)
            .is_none()
            .then(|| INVALID_DURATION.to_string());
        self.is_valid = [
            &self.title_error,
            &self.director_error,
            &self.genre_error,
            &self.year_error,
            &self.duration_error,
        ]
        .iter()
        .all(|error| error.is_none());
    }

    /// Request body for a valid draft; `None` when any rule fails.
    fn to_new_movie(&self) -> Option<NewMovie> {
        let draft = &self.draft;
        Some(NewMovie {
            title: draft.title.trim().to_string(),
            director: draft.director.trim().to_string(),
            year: int_above(&draft.year, MIN_RELEASE_YEAR_EXCLUSIVE)?,
            duration_minutes: int_above(&draft.duration, 0)?,
            genre: draft.genre.trim().to_string(),
            image_url: None,
            thumbnail_url: None,
        })
        .filter(|_| self.is_valid)
    }
}

pub struct AddMovieController {
    admin: Arc<AdminRepository>,
    form: watch::Sender<AddMovieForm>,
    result: StateCell<Movie>,
}

impl AddMovieController {
    pub fn new(admin: Arc<AdminRepository>) -> Self {
        Self {
            admin,
            form: watch::channel(AddMovieForm::default()).0,
            result: StateCell::new(RequestState::Idle),
        }
    }

    pub fn form(&self) -> AddMovieForm {
        self.form.borrow().clone()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<AddMovieForm> {
        self.form.subscribe()
    }

    pub fn add_movie_result(&self) -> RequestState<Movie> {
        self.result.get()
    }

    pub fn subscribe_add_movie_result(&self) -> watch::Receiver<RequestState<Movie>> {
        self.result.subscribe()
    }

    pub fn on_form_change(&self, draft: MovieDraft) {
        self.form.send_modify(|form| {
            form.draft = draft;
            form.validate();
        });
    }

    pub async fn create_movie(&self) {
        self.form.send_modify(AddMovieForm::validate);
        let movie = self.form.borrow().to_new_movie();
        let Some(movie) = movie else {
            return;
        };
        let Some(ticket) = self.result.try_begin() else {
            return;
        };

        let next = match self.admin.create_movie(&movie).await {
            Ok(created) => {
                info!("event=movie_create module=controller status=ok");
                RequestState::Success(created)
            }
            Err(err) => {
                warn!("event=movie_create module=controller status=error error={err}");
                RequestState::Error(err.user_message())
            }
        };
        self.result.finish(ticket, next);
    }
}
