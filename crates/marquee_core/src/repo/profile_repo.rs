//! Signed-in user's own profile.

use super::SessionGate;
use crate::api::{ApiGateway, ApiResult, ImageUpload};
use crate::model::user::UserProfile;
use crate::session::SessionStore;
use std::sync::Arc;

pub struct ProfileRepository {
    gateway: Arc<dyn ApiGateway>,
    gate: SessionGate,
}

impl ProfileRepository {
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            gate: SessionGate::new(store),
        }
    }

    pub async fn my_profile(&self) -> ApiResult<UserProfile> {
        let auth = self.gate.authorize("get_my_profile")?;
        self.gateway.fetch_my_profile(&auth).await
    }

    /// Sends `profile` as a full replacement; there is no partial patch.
    pub async fn update_my_profile(&self, profile: &UserProfile) -> ApiResult<UserProfile> {
        let auth = self.gate.authorize("update_my_profile")?;
        self.gateway.update_my_profile(&auth, profile).await
    }

    pub async fn upload_avatar(&self, image: ImageUpload) -> ApiResult<UserProfile> {
        let auth = self.gate.authorize("upload_avatar")?;
        self.gateway.upload_avatar(&auth, image).await
    }
}
