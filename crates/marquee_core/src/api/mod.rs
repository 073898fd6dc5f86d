//! Remote backend contract and its HTTP implementation.
//!
//! # Responsibility
//! - Describe every backend endpoint the repositories depend on.
//! - Categorize failures into a small, displayable taxonomy.
//!
//! # Invariants
//! - Authenticated endpoints only accept an `AuthHeader`, never a raw token.
//! - `ApiError::user_message()` is never empty.

mod gateway;
mod http;
pub mod poster;

pub use gateway::{ApiGateway, ImageUpload};
pub use http::{extract_server_message, HttpGateway};

use std::fmt::{Debug, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback shown when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No session token was available locally; nothing was sent.
    #[error("User not authenticated")]
    Unauthenticated,
    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),
    /// Backend answered with a non-2xx status.
    #[error("request rejected with status {status}{}", message_suffix(.message))]
    Rejected { status: u16, message: Option<String> },
    /// Response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Displayable message for the UI.
    ///
    /// Backend-supplied rejection text wins; otherwise a fixed message per
    /// category.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => self.to_string(),
            Self::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Rejected { status: 401, .. } => "Invalid credentials".to_string(),
            Self::Rejected { .. } | Self::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

/// `Authorization` header value for one authenticated call.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    pub fn bearer(token: &str) -> Self {
        Self(format!("Bearer {token}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for AuthHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthHeader(Bearer ***)")
    }
}
