//! Read-only catalog access.

use super::SessionGate;
use crate::api::{ApiGateway, ApiResult};
use crate::model::movie::Movie;
use crate::session::SessionStore;
use std::sync::Arc;

pub struct MovieRepository {
    gateway: Arc<dyn ApiGateway>,
    gate: SessionGate,
}

impl MovieRepository {
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            gate: SessionGate::new(store),
        }
    }

    pub async fn movies(&self) -> ApiResult<Vec<Movie>> {
        let auth = self.gate.authorize("list_movies")?;
        self.gateway.list_movies(&auth).await
    }

    pub async fn movie_by_id(&self, movie_id: &str) -> ApiResult<Movie> {
        let auth = self.gate.authorize("get_movie_by_id")?;
        self.gateway.get_movie_by_id(&auth, movie_id).await
    }
}
