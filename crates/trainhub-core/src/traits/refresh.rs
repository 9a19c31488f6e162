//! Transport trait for the credentialed token refresh endpoint.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for fetching a fresh bearer token from the issuing backend.
///
/// The session service depends on this seam instead of a concrete HTTP
/// client so the refresh flow can be exercised in-process. Implementations
/// must include the session credential (cookie) with the request and pass
/// the workspace id through when one is known.
#[async_trait]
pub trait RefreshTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Request a fresh token, optionally scoped to a workspace.
    ///
    /// Returns the raw token string (the refresh endpoint does not wrap it
    /// in a JSON envelope).
    async fn fetch_token(&self, workspace_id: Option<&str>) -> AppResult<String>;
}
