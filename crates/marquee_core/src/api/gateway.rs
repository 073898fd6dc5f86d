use super::{ApiResult, AuthHeader};
use crate::model::auth::{AuthPayload, ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::model::movie::{Movie, NewMovie};
use crate::model::user::{User, UserProfile};
use async_trait::async_trait;

/// Encoded image ready for a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Multipart form field name, e.g. `avatar`.
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Backend endpoints consumed by the repositories.
///
/// Implementations return the decoded payload or a categorized `ApiError`.
/// They never read session state themselves.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthPayload>;
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthPayload>;
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()>;

    async fn fetch_current_user(&self, auth: &AuthHeader) -> ApiResult<User>;
    async fn fetch_my_profile(&self, auth: &AuthHeader) -> ApiResult<UserProfile>;
    async fn update_my_profile(
        &self,
        auth: &AuthHeader,
        profile: &UserProfile,
    ) -> ApiResult<UserProfile>;
    async fn upload_avatar(&self, auth: &AuthHeader, image: ImageUpload)
        -> ApiResult<UserProfile>;

    async fn list_movies(&self, auth: &AuthHeader) -> ApiResult<Vec<Movie>>;
    async fn get_movie_by_id(&self, auth: &AuthHeader, movie_id: &str) -> ApiResult<Movie>;

    async fn list_users(&self, auth: &AuthHeader) -> ApiResult<Vec<User>>;
    async fn create_movie(&self, auth: &AuthHeader, movie: &NewMovie) -> ApiResult<Movie>;
}
