//! Authenticated request pipeline with a single refresh-and-retry on 401.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use trainhub_core::config::api::ApiConfig;
use trainhub_core::error::{AppError, ErrorKind};
use trainhub_core::result::AppResult;

use trainhub_auth::session::SessionService;

/// Issues API requests with the session's bearer token attached.
///
/// A request answered with 401 triggers exactly one token refresh and one
/// resubmission; a second 401 (or a failed refresh) surfaces as
/// `Unauthorized` — the pipeline never loops. When no token is present the
/// request proceeds unauthenticated.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Base URL all paths resolve against, without trailing slash.
    base_url: String,
    /// Session providing the bearer token and the refresh flow.
    session: Arc<SessionService>,
}

impl ApiClient {
    /// Creates a client for the configured API base URL.
    pub fn new(http: reqwest::Client, config: &ApiConfig, session: Arc<SessionService>) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Issues a GET request.
    pub async fn get(&self, path: &str) -> AppResult<reqwest::Response> {
        self.execute(Method::GET, path, None).await
    }

    /// Issues a GET request and deserializes the JSON response body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.get(path).await?;
        response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid JSON response from {path}: {e}"),
                e,
            )
        })
    }

    /// Issues a POST request with a JSON body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> AppResult<reqwest::Response> {
        self.execute(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    /// Issues a PUT request with a JSON body.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> AppResult<reqwest::Response> {
        self.execute(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await
    }

    /// Issues a DELETE request.
    pub async fn delete(&self, path: &str) -> AppResult<reqwest::Response> {
        self.execute(Method::DELETE, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut retried = false;

        loop {
            let mut request = self.http.request(method.clone(), &url);
            if let Some(token) = self.session.token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Request to {path} failed: {e}"),
                    e,
                )
            })?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            if retried {
                warn!(path, "Request denied again after token refresh");
                return Err(AppError::unauthorized(format!(
                    "Request to {path} was denied after token refresh"
                )));
            }
            retried = true;

            debug!(path, "Request denied; refreshing token once");
            if let Err(refresh_error) = self.session.refresh(None).await {
                warn!(
                    path,
                    error = %refresh_error,
                    "Token refresh after 401 failed; logging out"
                );
                self.session.logout();
                return Err(AppError::unauthorized(format!(
                    "Request to {path} was denied and token refresh failed"
                )));
            }
        }
    }
}
