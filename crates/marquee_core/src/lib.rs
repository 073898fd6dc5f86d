//! Session-aware data layer for the Marquee movie catalog client.
//! UI hosts observe controller state; all backend and storage access lives here.

pub mod api;
pub mod config;
pub mod context;
pub mod controller;
pub mod db;
pub mod logging;
pub mod media;
pub mod model;
pub mod repo;
pub mod session;

pub use api::poster::{PosterLookup, PosterLookupError, TmdbPosterLookup};
pub use api::{ApiError, ApiGateway, ApiResult, AuthHeader, HttpGateway, ImageUpload};
pub use config::{ClientConfig, ConfigError};
pub use context::{AppContext, ContextError};
pub use controller::RequestState;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::auth::{AuthSession, LoginRequest, RegisterRequest};
pub use model::movie::{Movie, NewMovie};
pub use model::user::{User, UserProfile, ADMIN_ROLE};
pub use session::{AuthStatus, Session, SessionError, SessionStore, SqliteSessionStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
