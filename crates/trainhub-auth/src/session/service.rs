//! Session lifecycle facade — silent refresh, interactive login seeding,
//! logout, and the authentication queries consumed by the UI layer.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;
use trainhub_core::traits::RefreshTransport;

use crate::token::decoder::TokenDecoder;
use crate::token::workspace::select_workspace;
use crate::user::User;

use super::scheduler::RefreshScheduler;
use super::store::{SessionSnapshot, SessionStore};

type InflightRefresh = Shared<BoxFuture<'static, AppResult<String>>>;

/// Orchestrates token decoding, workspace selection, permission
/// resolution, proactive refresh scheduling, and the session store.
///
/// The session moves between unauthenticated, refreshing, and
/// authenticated; a refresh failure of any kind clears all state, so an
/// invalid session always reads as unauthenticated rather than degrading
/// to an anonymous user.
pub struct SessionService {
    /// Token decoder.
    decoder: TokenDecoder,
    /// Transport for the credentialed refresh endpoint.
    transport: Arc<dyn RefreshTransport>,
    /// Session state.
    store: SessionStore,
    /// Proactive refresh timer.
    scheduler: RefreshScheduler,
    /// The in-flight refresh shared by concurrent callers.
    inflight: Mutex<Option<InflightRefresh>>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionService {
    /// Creates a session service in the unauthenticated state.
    pub fn new(
        decoder: TokenDecoder,
        transport: Arc<dyn RefreshTransport>,
        refresh_lead: Duration,
    ) -> Self {
        let scheduler = RefreshScheduler::new(decoder.clone(), refresh_lead);
        Self {
            decoder,
            transport,
            store: SessionStore::new(),
            scheduler,
            inflight: Mutex::new(None),
        }
    }

    /// Refreshes the bearer token and rebuilds the derived session state.
    ///
    /// Concurrent callers share a single in-flight refresh instead of
    /// issuing duplicate network calls. On success the token, expiry,
    /// user, and workspace id are applied as one atomic replacement and
    /// the refresh timer is re-armed; a logout that happened mid-flight
    /// wins and the result is discarded. On any failure the session is
    /// cleared and the error propagates to the caller.
    pub async fn refresh(self: &Arc<Self>, workspace_hint: Option<String>) -> AppResult<String> {
        let shared = {
            let mut slot = self.inflight.lock().await;
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let service = Arc::clone(self);
                    let future = async move { service.run_refresh(workspace_hint).await }
                        .boxed()
                        .shared();
                    *slot = Some(future.clone());
                    future
                }
            }
        };
        shared.await
    }

    /// Seeds the session from an interactively obtained token.
    ///
    /// Decodes synchronously, applies the derived state, and arms the
    /// refresh timer; never touches the network. A decode or workspace
    /// failure clears any existing session state and propagates.
    pub fn set_token(self: &Arc<Self>, token: &str, workspace_hint: Option<&str>) -> AppResult<User> {
        match self.build_snapshot(token, workspace_hint) {
            Ok((snapshot, user)) => {
                self.store.replace(snapshot);
                self.arm_refresh_timer(token);
                info!(
                    user_id = %user.id,
                    workspace_id = %user.workspace_id,
                    role = %user.role,
                    "Session established from login token"
                );
                Ok(user)
            }
            Err(e) => {
                self.store.clear();
                self.scheduler.cancel();
                error!(error = %e, "Login token rejected; session cleared");
                Err(e)
            }
        }
    }

    /// Ends the session: advances the epoch so any in-flight refresh
    /// result is discarded, cancels the refresh timer, and clears all
    /// state. Safe to call when already logged out.
    pub fn logout(&self) {
        self.store.clear();
        self.scheduler.cancel();
        info!("Session cleared");
    }

    /// The current user profile, if authenticated.
    pub fn current_user(&self) -> Option<User> {
        self.store.user()
    }

    /// The selected workspace id, if any.
    pub fn current_workspace_id(&self) -> Option<String> {
        self.store.workspace_id()
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    /// Point-in-time check: a token is present and its expiry is still in
    /// the future.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_token_valid()
    }

    async fn run_refresh(self: Arc<Self>, workspace_hint: Option<String>) -> AppResult<String> {
        let epoch = self.store.epoch();
        let known_workspace = workspace_hint.clone().or_else(|| self.store.workspace_id());

        let result = async {
            let token = self.transport.fetch_token(known_workspace.as_deref()).await?;
            let (snapshot, user) = self.build_snapshot(&token, workspace_hint.as_deref())?;
            Ok::<_, AppError>((token, snapshot, user))
        }
        .await;

        // Release the single-flight slot before reporting so a follow-up
        // refresh starts a fresh network call.
        *self.inflight.lock().await = None;

        match result {
            Ok((token, snapshot, user)) => {
                if !self.store.apply_if_current(epoch, snapshot) {
                    debug!("Discarding refresh result: session was terminated mid-flight");
                    return Err(AppError::unauthorized("Session was terminated during refresh"));
                }
                self.arm_refresh_timer(&token);
                info!(
                    user_id = %user.id,
                    workspace_id = %user.workspace_id,
                    role = %user.role,
                    "Session refreshed"
                );
                Ok(token)
            }
            Err(e) => {
                self.store.clear();
                self.scheduler.cancel();
                error!(error = %e, "Token refresh failed; session cleared");
                Err(e)
            }
        }
    }

    fn build_snapshot(
        &self,
        token: &str,
        preferred_workspace: Option<&str>,
    ) -> AppResult<(SessionSnapshot, User)> {
        let claims = self.decoder.decode(token)?;
        let selection = select_workspace(&claims, preferred_workspace)?;
        let user = User::from_claims(&claims, &selection);
        let snapshot = SessionSnapshot {
            token: Some(token.to_string()),
            expires_at: Some(claims.expires_at()),
            user: Some(user.clone()),
            workspace_id: Some(selection.workspace_id),
        };
        Ok((snapshot, user))
    }

    fn arm_refresh_timer(self: &Arc<Self>, token: &str) {
        let weak = Arc::downgrade(self);
        self.scheduler.arm(token, move || async move {
            if let Some(service) = weak.upgrade() {
                if let Err(e) = service.refresh(None).await {
                    error!(error = %e, "Scheduled token refresh failed");
                }
            }
        });
    }
}
