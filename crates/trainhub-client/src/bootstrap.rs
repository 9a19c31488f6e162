//! Boot-time session establishment with bounded retry.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use trainhub_core::config::auth::AuthConfig;
use trainhub_core::error::ErrorKind;
use trainhub_core::result::AppResult;

use trainhub_auth::session::SessionService;

/// Performs the boot refresh, retrying network failures a bounded number
/// of times before giving up.
///
/// Only `RefreshNetwork` failures are retried; a token that decodes badly
/// or carries no usable workspace is final immediately. When retries are
/// exhausted the last error propagates and the session stays cleared — the
/// caller routes to its unauthorized surface.
pub async fn bootstrap_session(
    session: &Arc<SessionService>,
    config: &AuthConfig,
    workspace_hint: Option<String>,
) -> AppResult<()> {
    let mut attempt: u32 = 0;
    loop {
        match session.refresh(workspace_hint.clone()).await {
            Ok(_) => return Ok(()),
            Err(e)
                if e.kind == ErrorKind::RefreshNetwork
                    && attempt < config.bootstrap_retry_attempts =>
            {
                attempt += 1;
                warn!(
                    attempt,
                    max_attempts = config.bootstrap_retry_attempts,
                    error = %e,
                    "Boot refresh failed; retrying"
                );
                tokio::time::sleep(Duration::from_secs(config.bootstrap_retry_delay_seconds)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
