//! Backend API endpoint configuration.

use serde::{Deserialize, Serialize};

/// Location of the backend REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every API path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Full URL of the credentialed token refresh endpoint.
    #[serde(default = "default_refresh_url")]
    pub refresh_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_url: default_refresh_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_refresh_url() -> String {
    "http://localhost:8080/api/auth/refresh".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
