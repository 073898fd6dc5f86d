#![allow(dead_code)]

use async_trait::async_trait;
use marquee_core::api::poster::{PosterLookup, PosterLookupError};
use marquee_core::api::{ApiError, ApiGateway, ApiResult, AuthHeader, ImageUpload};
use marquee_core::db::open_db_in_memory;
use marquee_core::model::auth::{AuthPayload, ForgotPasswordRequest, LoginRequest, RegisterRequest};
use marquee_core::model::movie::{Movie, NewMovie};
use marquee_core::model::user::{ProfileOwner, User, UserProfile};
use marquee_core::session::{Session, SessionResult, SessionStore, SqliteSessionStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Notify};

pub fn memory_store() -> Arc<SqliteSessionStore> {
    Arc::new(SqliteSessionStore::new(open_db_in_memory().unwrap()).unwrap())
}

pub fn signed_in_store(token: &str, role: &str) -> Arc<SqliteSessionStore> {
    let store = memory_store();
    store.save_session(token, role).unwrap();
    store
}

/// Session store wrapper that counts writes.
pub struct CountingStore {
    inner: Arc<SqliteSessionStore>,
    saves: AtomicUsize,
    clears: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<SqliteSessionStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            saves: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        })
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for CountingStore {
    fn snapshot(&self) -> Session {
        self.inner.snapshot()
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.subscribe()
    }

    fn save_session(&self, token: &str, role: &str) -> SessionResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_session(token, role)
    }

    fn clear_session(&self) -> SessionResult<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear_session()
    }
}

pub fn user(id: &str, role: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        role: role.to_string(),
        name: format!("User {id}"),
        phone: None,
    }
}

pub fn auth_payload(token: &str, role: &str) -> AuthPayload {
    AuthPayload {
        user: Some(user("u1", role)),
        access_token: token.to_string(),
    }
}

pub fn movie(id: &str, title: &str, director: &str) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        director: director.to_string(),
        year: 1999,
        duration_minutes: 120,
        genre: "Drama".to_string(),
        image_url: None,
        thumbnail_url: None,
        enriched_poster_url: None,
    }
}

pub fn profile(name: &str) -> UserProfile {
    UserProfile {
        id: "p1".to_string(),
        owner: ProfileOwner::Summary {
            id: Some("u1".to_string()),
            email: "ana@example.com".to_string(),
            name: name.to_string(),
        },
        name: name.to_string(),
        phone: "555-0100".to_string(),
        preferences: vec!["Drama".to_string()],
        avatar_url: None,
    }
}

/// One gateway call as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: &'static str,
    pub auth: Option<String>,
}

/// Scripted responses for one endpoint. Queued entries are consumed first;
/// a queued `Notify` holds the call until the test releases it.
pub struct Script<T> {
    queued: VecDeque<(ApiResult<T>, Option<Arc<Notify>>)>,
    fallback: ApiResult<T>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: ApiResult<T>) -> Self {
        Self {
            queued: VecDeque::new(),
            fallback,
        }
    }

    fn next(&mut self) -> (ApiResult<T>, Option<Arc<Notify>>) {
        self.queued
            .pop_front()
            .unwrap_or_else(|| (self.fallback.clone(), None))
    }
}

fn not_scripted<T>() -> ApiResult<T> {
    Err(ApiError::Network("not scripted".to_string()))
}

#[derive(Default)]
pub struct Sent {
    pub register: Vec<RegisterRequest>,
    pub login: Vec<LoginRequest>,
    pub forgot_password: Vec<ForgotPasswordRequest>,
    pub profile_updates: Vec<UserProfile>,
    pub uploads: Vec<ImageUpload>,
    pub movie_ids: Vec<String>,
    pub created_movies: Vec<NewMovie>,
}

/// Recording `ApiGateway` with per-endpoint scripted results.
pub struct FakeGateway {
    calls: Mutex<Vec<RecordedCall>>,
    sent: Mutex<Sent>,
    pub register: Mutex<Script<AuthPayload>>,
    pub login: Mutex<Script<AuthPayload>>,
    pub forgot_password: Mutex<Script<()>>,
    pub current_user: Mutex<Script<User>>,
    pub my_profile: Mutex<Script<UserProfile>>,
    pub update_profile: Mutex<Script<UserProfile>>,
    pub upload_avatar: Mutex<Script<UserProfile>>,
    pub movies: Mutex<Script<Vec<Movie>>>,
    pub movie_by_id: Mutex<Script<Movie>>,
    pub users: Mutex<Script<Vec<User>>>,
    pub create_movie: Mutex<Script<Movie>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::default(),
            sent: Mutex::default(),
            register: Mutex::new(Script::new(not_scripted())),
            login: Mutex::new(Script::new(not_scripted())),
            forgot_password: Mutex::new(Script::new(Ok(()))),
            current_user: Mutex::new(Script::new(not_scripted())),
            my_profile: Mutex::new(Script::new(not_scripted())),
            update_profile: Mutex::new(Script::new(not_scripted())),
            upload_avatar: Mutex::new(Script::new(not_scripted())),
            movies: Mutex::new(Script::new(Ok(Vec::new()))),
            movie_by_id: Mutex::new(Script::new(not_scripted())),
            users: Mutex::new(Script::new(Ok(Vec::new()))),
            create_movie: Mutex::new(Script::new(not_scripted())),
        }
    }
}

pub fn set<T>(script: &Mutex<Script<T>>, result: ApiResult<T>) {
    script.lock().unwrap().fallback = result;
}

pub fn push<T>(script: &Mutex<Script<T>>, result: ApiResult<T>, hold: Option<Arc<Notify>>) {
    script.lock().unwrap().queued.push_back((result, hold));
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    pub fn sent<R>(&self, read: impl FnOnce(&Sent) -> R) -> R {
        read(&self.sent.lock().unwrap())
    }

    fn record(&self, endpoint: &'static str, auth: Option<&AuthHeader>) {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint,
            auth: auth.map(|header| header.as_str().to_string()),
        });
    }

    async fn answer<T: Clone>(script: &Mutex<Script<T>>) -> ApiResult<T> {
        let (result, hold) = script.lock().unwrap().next();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        result
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthPayload> {
        self.record("register", None);
        self.sent.lock().unwrap().register.push(request.clone());
        Self::answer(&self.register).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthPayload> {
        self.record("login", None);
        self.sent.lock().unwrap().login.push(request.clone());
        Self::answer(&self.login).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()> {
        self.record("forgot_password", None);
        self.sent.lock().unwrap().forgot_password.push(request.clone());
        Self::answer(&self.forgot_password).await
    }

    async fn fetch_current_user(&self, auth: &AuthHeader) -> ApiResult<User> {
        self.record("current_user", Some(auth));
        Self::answer(&self.current_user).await
    }

    async fn fetch_my_profile(&self, auth: &AuthHeader) -> ApiResult<UserProfile> {
        self.record("my_profile", Some(auth));
        Self::answer(&self.my_profile).await
    }

    async fn update_my_profile(
        &self,
        auth: &AuthHeader,
        profile: &UserProfile,
    ) -> ApiResult<UserProfile> {
        self.record("update_profile", Some(auth));
        self.sent.lock().unwrap().profile_updates.push(profile.clone());
        Self::answer(&self.update_profile).await
    }

    async fn upload_avatar(
        &self,
        auth: &AuthHeader,
        image: ImageUpload,
    ) -> ApiResult<UserProfile> {
        self.record("upload_avatar", Some(auth));
        self.sent.lock().unwrap().uploads.push(image);
        Self::answer(&self.upload_avatar).await
    }

    async fn list_movies(&self, auth: &AuthHeader) -> ApiResult<Vec<Movie>> {
        self.record("movies", Some(auth));
        Self::answer(&self.movies).await
    }

    async fn get_movie_by_id(&self, auth: &AuthHeader, movie_id: &str) -> ApiResult<Movie> {
        self.record("movie_by_id", Some(auth));
        self.sent.lock().unwrap().movie_ids.push(movie_id.to_string());
        Self::answer(&self.movie_by_id).await
    }

    async fn list_users(&self, auth: &AuthHeader) -> ApiResult<Vec<User>> {
        self.record("users", Some(auth));
        Self::answer(&self.users).await
    }

    async fn create_movie(&self, auth: &AuthHeader, movie: &NewMovie) -> ApiResult<Movie> {
        self.record("create_movie", Some(auth));
        self.sent.lock().unwrap().created_movies.push(movie.clone());
        Self::answer(&self.create_movie).await
    }
}

#[derive(Debug, Clone)]
pub enum PosterAnswer {
    Found(String),
    Missing,
    Fails,
}

/// Counting `PosterLookup` with a fixed answer.
pub struct FakePosterLookup {
    answer: PosterAnswer,
    lookups: AtomicUsize,
    titles: Mutex<Vec<String>>,
}

impl FakePosterLookup {
    pub fn new(answer: PosterAnswer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            lookups: AtomicUsize::new(0),
            titles: Mutex::default(),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

#[async_trait]
impl PosterLookup for FakePosterLookup {
    async fn find_poster(&self, title: &str) -> Result<Option<String>, PosterLookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.titles.lock().unwrap().push(title.to_string());
        match &self.answer {
            PosterAnswer::Found(url) => Ok(Some(url.clone())),
            PosterAnswer::Missing => Ok(None),
            PosterAnswer::Fails => Err(PosterLookupError::Transport("offline".to_string())),
        }
    }
}
