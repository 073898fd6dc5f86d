//! Account entry points: register, login, password reset, current user.

use super::SessionGate;
use crate::api::{ApiError, ApiGateway, ApiResult};
use crate::model::auth::{
    AuthPayload, AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest,
};
use crate::model::user::User;
use crate::session::SessionStore;
use log::info;
use std::sync::Arc;

/// Register/login return the combined payload; persisting the session is the
/// caller's job.
pub struct AuthRepository {
    gateway: Arc<dyn ApiGateway>,
    gate: SessionGate,
}

impl AuthRepository {
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            gate: SessionGate::new(store),
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthSession> {
        let payload = self.gateway.register(request).await?;
        into_session("register", payload)
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthSession> {
        let payload = self.gateway.login(request).await?;
        into_session("login", payload)
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()> {
        self.gateway.forgot_password(request).await
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        let auth = self.gate.authorize("current_user")?;
        self.gateway.fetch_current_user(&auth).await
    }
}

fn into_session(operation: &'static str, payload: AuthPayload) -> ApiResult<AuthSession> {
    let AuthPayload { user, access_token } = payload;
    let user = user.ok_or_else(|| {
        ApiError::Decode(format!("{operation} response did not include user data"))
    })?;
    if access_token.is_empty() {
        return Err(ApiError::Decode(format!(
            "{operation} response did not include an access token"
        )));
    }
    info!("event=auth module=repo status=ok op={operation} role={}", user.role);
    Ok(AuthSession { user, access_token })
}
