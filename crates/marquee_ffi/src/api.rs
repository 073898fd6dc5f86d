//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose sign-in, sign-out and catalog use cases to Dart via FRB.
//! - Own the process-wide client context and the tokio runtime it runs on.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as messages inside response envelopes.
//! - The client context is created once; later calls must match its data dir.

use log::{info, warn};
use marquee_core::controller::catalog::CatalogController;
use marquee_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, ping as ping_inner, AppContext, AuthStatus, ClientConfig, Movie, RequestState,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::runtime::Runtime;

const SESSION_DB_FILE_NAME: &str = "marquee_session.sqlite3";
const UNINITIALIZED_MESSAGE: &str = "client is not initialized; call init_client first";

static CLIENT: OnceLock<Client> = OnceLock::new();

struct Client {
    runtime: Runtime,
    context: AppContext,
    data_dir: PathBuf,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive);
///   blank selects [`default_log_level`].
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(resolve_level(&level), &log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Build-profile log level: `debug` in debug builds, `info` in release.
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_string()
}

fn resolve_level(level: &str) -> &str {
    if level.trim().is_empty() {
        default_log_level_inner()
    } else {
        level
    }
}

/// Opens the session store under `data_dir` and wires the HTTP client.
///
/// # FFI contract
/// - Sync call; opens a SQLite file and starts a background runtime.
/// - A repeated call with the same `data_dir` is a no-op.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_client(
    api_base_url: String,
    data_dir: String,
    poster_api_key: Option<String>,
) -> String {
    match try_init_client(&api_base_url, &data_dir, poster_api_key) {
        Ok(()) => String::new(),
        Err(message) => {
            warn!("event=client_init module=ffi status=error");
            message
        }
    }
}

/// Launch routing: `authenticated`, `unauthenticated`, or `uninitialized`.
#[flutter_rust_bridge::frb(sync)]
pub fn session_status() -> String {
    match CLIENT.get() {
        Some(client) => AuthStatus::of(&client.context.session_store().snapshot())
            .as_str()
            .to_string(),
        None => "uninitialized".to_string(),
    }
}

/// Sign-in outcome for login and register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    /// Stored role on success.
    pub role: Option<String>,
    /// Field or server message on failure; empty on success.
    pub message: String,
}

impl AuthResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            role: None,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Catalog row projected for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieItem {
    pub id: String,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub duration_minutes: i32,
    pub genre: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieListResponse {
    pub ok: bool,
    pub items: Vec<MovieItem>,
    pub message: String,
}

/// Validates credentials, signs in, and stores the session.
pub async fn login(email: String, password: String) -> AuthResponse {
    let Some(client) = CLIENT.get() else {
        return AuthResponse::failure(UNINITIALIZED_MESSAGE);
    };
    let controller = client.context.login_controller();
    let outcome = client
        .run(async move {
            controller.on_email_change(email);
            controller.on_password_change(password);
            controller.login().await;
            let form = controller.form();
            let field_error = form.email_error.or(form.password_error);
            (controller.login_result(), field_error)
        })
        .await;
    match outcome {
        Some((result, field_error)) => auth_response(result, field_error),
        None => AuthResponse::failure("login task was cancelled"),
    }
}

/// Creates an account with the default user role and signs in.
pub async fn register(name: String, email: String, password: String) -> AuthResponse {
    let Some(client) = CLIENT.get() else {
        return AuthResponse::failure(UNINITIALIZED_MESSAGE);
    };
    let controller = client.context.register_controller();
    let outcome = client
        .run(async move {
            controller.on_name_change(name);
            controller.on_email_change(email);
            controller.on_password_change(password);
            controller.register().await;
            let form = controller.form();
            let field_error = form
                .name_error
                .or(form.email_error)
                .or(form.password_error);
            (controller.register_result(), field_error)
        })
        .await;
    match outcome {
        Some((result, field_error)) => auth_response(result, field_error),
        None => AuthResponse::failure("register task was cancelled"),
    }
}

/// Clears the stored session.
pub async fn logout() -> ActionResponse {
    let Some(client) = CLIENT.get() else {
        return ActionResponse {
            ok: false,
            message: UNINITIALIZED_MESSAGE.to_string(),
        };
    };
    match client.context.session_store().clear_session() {
        Ok(()) => ActionResponse {
            ok: true,
            message: String::new(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("logout failed: {err}"),
        },
    }
}

/// Fetches the catalog and applies the search filter.
pub async fn list_movies(query: String) -> MovieListResponse {
    let Some(client) = CLIENT.get() else {
        return movie_failure(UNINITIALIZED_MESSAGE);
    };
    let catalog =
        CatalogController::new(client.context.movie_repository(), client.context.session_store());
    let outcome = client
        .run(async move {
            catalog.refresh().await;
            catalog.on_search_query_change(query);
            (catalog.movie_state(), catalog.filtered())
        })
        .await;
    match outcome {
        Some((RequestState::Error(message), _)) => movie_failure(message),
        Some((_, movies)) => {
            let items: Vec<MovieItem> = movies.into_iter().map(to_movie_item).collect();
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} movie(s).", items.len())
            };
            MovieListResponse {
                ok: true,
                items,
                message,
            }
        }
        None => movie_failure("list_movies task was cancelled"),
    }
}

impl Client {
    /// Runs `task` on the client runtime; `None` if it panicked or was cancelled.
    async fn run<F>(&self, task: F) -> Option<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(task).await.ok()
    }
}

fn try_init_client(
    api_base_url: &str,
    data_dir: &str,
    poster_api_key: Option<String>,
) -> Result<(), String> {
    let data_dir = PathBuf::from(data_dir.trim());
    if !data_dir.is_absolute() {
        return Err(format!(
            "data_dir must be an absolute path, got `{}`",
            data_dir.display()
        ));
    }
    if api_base_url.trim().is_empty() {
        return Err("api_base_url cannot be empty".to_string());
    }
    if let Some(client) = CLIENT.get() {
        return ensure_same_dir(client, &data_dir);
    }

    std::fs::create_dir_all(&data_dir)
        .map_err(|err| format!("failed to create data dir `{}`: {err}", data_dir.display()))?;
    let mut config = ClientConfig::new(api_base_url);
    if let Some(key) = poster_api_key {
        config = config.with_poster_api_key(key);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("marquee-io")
        .build()
        .map_err(|err| format!("failed to start runtime: {err}"))?;
    let context = AppContext::init(config, data_dir.join(SESSION_DB_FILE_NAME))
        .map_err(|err| format!("init_client failed: {err}"))?;

    let client = Client {
        runtime,
        context,
        data_dir: data_dir.clone(),
    };
    if let Err(rejected) = CLIENT.set(client) {
        // Lost a race with a concurrent init; keep the winner.
        rejected.runtime.shutdown_background();
        let active = CLIENT.get().ok_or_else(|| UNINITIALIZED_MESSAGE.to_string())?;
        return ensure_same_dir(active, &data_dir);
    }
    info!("event=client_init module=ffi status=ok");
    Ok(())
}

fn ensure_same_dir(client: &Client, data_dir: &Path) -> Result<(), String> {
    if client.data_dir.as_path() == data_dir {
        return Ok(());
    }
    Err(format!(
        "client already initialized at `{}`; refusing to switch to `{}`",
        client.data_dir.display(),
        data_dir.display()
    ))
}

fn auth_response(
    result: RequestState<marquee_core::AuthSession>,
    field_error: Option<String>,
) -> AuthResponse {
    match result {
        RequestState::Success(session) => AuthResponse {
            ok: true,
            role: Some(session.user.role),
            message: String::new(),
        },
        RequestState::Error(message) => AuthResponse::failure(message),
        RequestState::Idle | RequestState::Loading => {
            AuthResponse::failure(field_error.unwrap_or_else(|| "request not sent".to_string()))
        }
    }
}

fn movie_failure(message: impl Into<String>) -> MovieListResponse {
    MovieListResponse {
        ok: false,
        items: Vec::new(),
        message: message.into(),
    }
}

fn to_movie_item(movie: Movie) -> MovieItem {
    MovieItem {
        id: movie.id,
        title: movie.title,
        director: movie.director,
        year: movie.year,
        duration_minutes: movie.duration_minutes,
        genre: movie.genre,
        image_url: movie.image_url,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        auth_response, core_version, default_log_level, init_client, init_logging, list_movies,
        login, ping, resolve_level, session_status,
    };
    use marquee_core::RequestState;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let dir = std::env::temp_dir().to_string_lossy().to_string();
        let error = init_logging("verbose".to_string(), dir);
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn blank_level_falls_back_to_build_default() {
        assert_eq!(resolve_level("  "), default_log_level());
        assert_eq!(resolve_level("warn"), "warn");
        assert!(["debug", "info"].contains(&default_log_level().as_str()));
    }

    #[test]
    fn init_client_rejects_relative_dir_and_blank_url() {
        let error = init_client("http://localhost/api".to_string(), "data".to_string(), None);
        assert!(error.contains("absolute"));

        let dir = std::env::temp_dir().to_string_lossy().to_string();
        let error = init_client("  ".to_string(), dir, None);
        assert!(error.contains("api_base_url"));
        assert_eq!(session_status(), "uninitialized");
    }

    #[test]
    fn use_cases_before_init_return_failure_envelopes() {
        let response = block_on(login("ana@example.com".to_string(), "pw".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("init_client"));

        let movies = block_on(list_movies(String::new()));
        assert!(!movies.ok);
        assert!(movies.items.is_empty());
    }

    #[test]
    fn unsent_request_reports_first_field_error() {
        let response = auth_response(
            RequestState::Idle,
            Some("Invalid email address".to_string()),
        );
        assert!(!response.ok);
        assert_eq!(response.message, "Invalid email address");
    }
}
