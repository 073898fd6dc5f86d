//! Admin-scoped backend operations.
//!
//! Only token presence is enforced here. Callers gate the UI on the session
//! role before offering these actions; the backend enforces the rest.

use super::SessionGate;
use crate::api::{ApiGateway, ApiResult};
use crate::model::movie::{Movie, NewMovie};
use crate::model::user::User;
use crate::session::SessionStore;
use std::sync::Arc;

pub struct AdminRepository {
    gateway: Arc<dyn ApiGateway>,
    gate: SessionGate,
}

impl AdminRepository {
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            gate: SessionGate::new(store),
        }
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        let auth = self.gate.authorize("list_users")?;
        self.gateway.list_users(&auth).await
    }

    pub async fn create_movie(&self, movie: &NewMovie) -> ApiResult<Movie> {
        let auth = self.gate.authorize("create_movie")?;
        self.gateway.create_movie(&auth, movie).await
    }
}
