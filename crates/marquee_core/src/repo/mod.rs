//! Session-gated repositories over the backend gateway.
//!
//! # Responsibility
//! - Translate domain operations into gateway calls.
//! - Attach the current bearer token to every authenticated call.
//!
//! # Invariants
//! - No authenticated call leaves the device without a non-empty token.
//! - The token is read once per call from the session store, never cached.
//! - Repositories never write session state and never check roles.

pub mod admin_repo;
pub mod auth_repo;
pub mod movie_repo;
pub mod profile_repo;

use crate::api::{ApiError, ApiResult, AuthHeader};
use crate::session::SessionStore;
use log::warn;
use std::sync::Arc;

/// Resolves the `Authorization` header for one authenticated call.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Reads the latest committed token.
    ///
    /// # Errors
    /// - `ApiError::Unauthenticated` when the token is absent or empty.
    pub fn authorize(&self, operation: &'static str) -> ApiResult<AuthHeader> {
        let session = self.store.snapshot();
        match session.bearer_token() {
            Some(token) => Ok(AuthHeader::bearer(token)),
            None => {
                warn!("event=repo_gate module=repo status=rejected op={operation} error_code=unauthenticated");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
