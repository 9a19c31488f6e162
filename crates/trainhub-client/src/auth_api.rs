//! Login and register endpoint bindings.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use trainhub_core::config::api::ApiConfig;
use trainhub_core::error::{AppError, ErrorKind};
use trainhub_core::result::AppResult;

use trainhub_auth::session::SessionService;
use trainhub_auth::user::User;

/// Interactive authentication against the backend.
///
/// On success the returned token seeds the session service; the user the
/// backend includes in the envelope is informational only — the session
/// derives its own profile from the token.
#[derive(Debug, Clone)]
pub struct AuthApi {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Session seeded after a successful login/registration.
    session: Arc<SessionService>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: &'a str,
}

/// `{token, user}` envelope returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for the new session.
    pub token: String,
    /// The backend's informational user payload.
    pub user: AccountSummary,
}

/// User payload as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummary {
    /// User id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Account-level role.
    pub role: String,
}

impl AuthApi {
    /// Creates the auth bindings for the configured backend.
    pub fn new(http: reqwest::Client, config: &ApiConfig, session: Arc<SessionService>) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Logs in with email and password, seeding the session from the
    /// returned token.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        workspace_hint: Option<&str>,
    ) -> AppResult<User> {
        let response = self
            .submit("/api/auth/login", &LoginRequest { email, password })
            .await?;
        let user = self.session.set_token(&response.token, workspace_hint)?;
        info!(user_id = %user.id, "Login succeeded");
        Ok(user)
    }

    /// Registers a new account and seeds the session from the returned
    /// token.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
        workspace_hint: Option<&str>,
    ) -> AppResult<User> {
        let response = self
            .submit(
                "/api/auth/register",
                &RegisterRequest {
                    name,
                    email,
                    password,
                    role,
                },
            )
            .await?;
        let user = self.session.set_token(&response.token, workspace_hint)?;
        info!(user_id = %user.id, "Registration succeeded");
        Ok(user)
    }

    async fn submit<T: Serialize>(&self, path: &str, body: &T) -> AppResult<AuthResponse> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Request to {path} failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::unauthorized("Invalid email or password"));
        }
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Auth endpoint {path} returned {status}"
            )));
        }

        response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid auth response from {path}: {e}"),
                e,
            )
        })
    }
}
