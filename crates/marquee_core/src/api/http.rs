//! reqwest implementation of `ApiGateway`.

use super::{ApiError, ApiGateway, ApiResult, AuthHeader, ImageUpload};
use crate::config::ClientConfig;
use crate::model::auth::{AuthPayload, ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::model::movie::{Movie, NewMovie};
use crate::model::user::{User, UserProfile};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// JSON-over-HTTP gateway to the catalog backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn request(&self, method: Method, path: &str, auth: Option<&AuthHeader>) -> RequestBuilder {
        let builder = self.client.request(method, self.config.endpoint(path));
        with_auth(builder, auth)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(endpoint, builder).await?;
        let body = response.bytes().await.map_err(map_transport)?;
        serde_json::from_slice(&body).map_err(|err| {
            warn!("event=api_call module=api status=error endpoint={endpoint} error_code=decode_failed");
            ApiError::Decode(err.to_string())
        })
    }

    async fn send(&self, endpoint: &'static str, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|err| {
            warn!("event=api_call module=api status=error endpoint={endpoint} error_code=transport");
            map_transport(err)
        })?;

        let status = response.status();
        debug!(
            "event=api_call module=api status=ok endpoint={endpoint} http_status={}",
            status.as_u16()
        );
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            "event=api_call module=api status=rejected endpoint={endpoint} http_status={}",
            status.as_u16()
        );
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: extract_server_message(&body),
        })
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        auth: Option<&AuthHeader>,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.request(Method::POST, endpoint, auth).json(body);
        self.send_json(endpoint, builder).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        auth: &AuthHeader,
    ) -> ApiResult<T> {
        let builder = self.request(Method::GET, endpoint, Some(auth));
        self.send_json(endpoint, builder).await
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthPayload> {
        self.post_json("auth/register", None, request).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthPayload> {
        self.post_json("auth/login", None, request).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()> {
        let builder = self
            .request(Method::POST, "auth/forgot-password", None)
            .json(request);
        self.send("auth/forgot-password", builder).await?;
        Ok(())
    }

    async fn fetch_current_user(&self, auth: &AuthHeader) -> ApiResult<User> {
        self.get_json("auth/profile", auth).await
    }

    async fn fetch_my_profile(&self, auth: &AuthHeader) -> ApiResult<UserProfile> {
        self.get_json("usuario-profile/me", auth).await
    }

    async fn update_my_profile(
        &self,
        auth: &AuthHeader,
        profile: &UserProfile,
    ) -> ApiResult<UserProfile> {
        let builder = self
            .request(Method::PUT, "usuario-profile/me", Some(auth))
            .json(profile);
        self.send_json("usuario-profile/me", builder).await
    }

    async fn upload_avatar(
        &self,
        auth: &AuthHeader,
        image: ImageUpload,
    ) -> ApiResult<UserProfile> {
        let ImageUpload {
            field_name,
            file_name,
            content_type,
            bytes,
        } = image;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(|err| ApiError::Decode(format!("invalid image content type: {err}")))?;
        let builder = self
            .request(Method::POST, "usuario-profile/me/avatar", Some(auth))
            .multipart(Form::new().part(field_name, part));
        self.send_json("usuario-profile/me/avatar", builder).await
    }

    async fn list_movies(&self, auth: &AuthHeader) -> ApiResult<Vec<Movie>> {
        self.get_json("pelicula", auth).await
    }

    async fn get_movie_by_id(&self, auth: &AuthHeader, movie_id: &str) -> ApiResult<Movie> {
        let url = resource_url(&self.config.endpoint("pelicula"), movie_id)?;
        let builder = with_auth(self.client.get(url), Some(auth));
        self.send_json("pelicula/{id}", builder).await
    }

    async fn list_users(&self, auth: &AuthHeader) -> ApiResult<Vec<User>> {
        self.get_json("usuario", auth).await
    }

    async fn create_movie(&self, auth: &AuthHeader, movie: &NewMovie) -> ApiResult<Movie> {
        self.post_json("pelicula", Some(auth), movie).await
    }
}

fn with_auth(builder: RequestBuilder, auth: Option<&AuthHeader>) -> RequestBuilder {
    match auth {
        Some(auth) => builder.header(AUTHORIZATION, auth.as_str()),
        None => builder,
    }
}

/// Appends `id` to `collection_url` as one percent-encoded path segment.
fn resource_url(collection_url: &str, id: &str) -> ApiResult<Url> {
    let mut url = Url::parse(collection_url)
        .map_err(|err| ApiError::Network(format!("invalid endpoint url: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Network(format!("endpoint url has no path: {collection_url}")))?
        .push(id);
    Ok(url)
}

fn map_transport(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Understands `{"message": "..."}`, `{"message": ["...", ...]}` and
/// `{"error": "..."}`. Returns `None` for anything else.
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => value.get("error")?.as_str()?.to_string(),
    };
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
