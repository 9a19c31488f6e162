//! HTTP implementation of the refresh transport.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use trainhub_core::config::api::ApiConfig;
use trainhub_core::error::{AppError, ErrorKind};
use trainhub_core::result::AppResult;
use trainhub_core::traits::RefreshTransport;

/// Header carrying the workspace id on refresh requests.
pub const WORKSPACE_HEADER: &str = "X-WORKSPACE-ID";

/// Builds the shared HTTP client.
///
/// The cookie store carries the refresh credential; the same client is
/// shared by the refresh transport and the request pipeline.
pub fn build_http_client(config: &ApiConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            )
        })
}

/// Calls the credentialed refresh endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRefreshTransport {
    /// Shared HTTP client (cookie store included).
    http: reqwest::Client,
    /// Full refresh endpoint URL.
    refresh_url: String,
}

impl HttpRefreshTransport {
    /// Creates a transport for the configured refresh endpoint.
    pub fn new(http: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            http,
            refresh_url: config.refresh_url.clone(),
        }
    }
}

#[async_trait]
impl RefreshTransport for HttpRefreshTransport {
    async fn fetch_token(&self, workspace_id: Option<&str>) -> AppResult<String> {
        let mut request = self.http.post(&self.refresh_url);
        if let Some(workspace_id) = workspace_id {
            request = request.header(WORKSPACE_HEADER, workspace_id);
        }

        debug!(workspace_id = ?workspace_id, "Requesting token refresh");

        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::RefreshNetwork,
                format!("Refresh request failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::refresh_network(format!(
                "Refresh endpoint returned {status}"
            )));
        }

        // The refresh endpoint returns the raw token, not a JSON envelope.
        let token = response.text().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::RefreshNetwork,
                format!("Failed to read refresh response: {e}"),
                e,
            )
        })?;

        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(AppError::refresh_network(
                "Refresh endpoint returned an empty body",
            ));
        }

        Ok(token)
    }
}
