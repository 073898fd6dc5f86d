//! Durable, observable session credentials.
//!
//! # Responsibility
//! - Persist the bearer token and role of the signed-in actor.
//! - Publish every committed change to live observers.
//!
//! # Invariants
//! - Token and role are saved together and cleared together.
//! - Observers never see a value that is not yet durable.
//! - `snapshot()` always reflects the latest committed record.

mod store;

pub use store::{SqliteSessionStore, ROLE_KEY, SESSION_STORE_NAME, TOKEN_KEY};

use std::pin::Pin;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

pub type SessionResult<T> = Result<T, SessionError>;

/// Stream of one session field; yields the current value first.
pub type FieldStream = Pin<Box<dyn Stream<Item = Option<String>> + Send>>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Db(#[from] crate::db::DbError),
    #[error("session storage lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for SessionError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value.into())
    }
}

/// Credentials of the signed-in actor. Both fields are `None` when signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<String>,
}

impl Session {
    /// Token usable for an authenticated call; empty strings count as absent.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}

/// Launch-time routing decision derived from the stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    pub fn of(session: &Session) -> Self {
        if session.is_authenticated() {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

/// Storage contract for session credentials.
///
/// Repositories and controllers receive this through their constructors.
pub trait SessionStore: Send + Sync {
    /// One-shot read of the latest committed session.
    fn snapshot(&self) -> Session;

    /// Live receiver over the committed session record.
    fn subscribe(&self) -> watch::Receiver<Session>;

    /// Replaces token and role in one durable write.
    fn save_session(&self, token: &str, role: &str) -> SessionResult<()>;

    /// Removes all session data in one durable write.
    fn clear_session(&self) -> SessionResult<()>;

    /// Current token, then every later change. Never ends on its own.
    fn observe_token(&self) -> FieldStream {
        Box::pin(WatchStream::new(self.subscribe()).map(|session| session.token))
    }

    /// Current role, then every later change. Never ends on its own.
    fn observe_role(&self) -> FieldStream {
        Box::pin(WatchStream::new(self.subscribe()).map(|session| session.role))
    }
}
