//! Session and token refresh configuration.

use serde::{Deserialize, Serialize};

/// Token refresh and bootstrap behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// How long before token expiry the proactive refresh fires, in seconds.
    #[serde(default = "default_refresh_lead")]
    pub refresh_lead_seconds: u64,
    /// Number of retries when the boot-time refresh fails on a network error.
    #[serde(default = "default_retry_attempts")]
    pub bootstrap_retry_attempts: u32,
    /// Delay between boot-time refresh retries, in seconds.
    #[serde(default = "default_retry_delay")]
    pub bootstrap_retry_delay_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_lead_seconds: default_refresh_lead(),
            bootstrap_retry_attempts: default_retry_attempts(),
            bootstrap_retry_delay_seconds: default_retry_delay(),
        }
    }
}

fn default_refresh_lead() -> u64 {
    60
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    3
}
