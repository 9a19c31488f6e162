//! Proactive one-shot refresh timer with cancel-and-replace semantics.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::token::decoder::TokenDecoder;

/// Arms a single pending refresh ahead of token expiry.
///
/// The timer fires `lead_time` before the token's `exp`; a token already
/// inside the lead window fires immediately rather than being skipped, so a
/// session always eventually refreshes. Re-arming cancels the previous
/// timer — at most one timer is pending at any instant. A token that
/// cannot be decoded arms nothing (logged, not an error).
pub struct RefreshScheduler {
    /// Decoder for expiry extraction.
    decoder: TokenDecoder,
    /// How long before expiry the refresh fires.
    lead_time: Duration,
    /// The single pending timer task.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("lead_time", &self.lead_time)
            .finish()
    }
}

impl RefreshScheduler {
    /// Creates a scheduler that fires `lead_time` before expiry.
    pub fn new(decoder: TokenDecoder, lead_time: Duration) -> Self {
        Self {
            decoder,
            lead_time,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `on_fire` ahead of the token's expiry, replacing any
    /// previously pending timer.
    pub fn arm<F, Fut>(&self, token: &str, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let claims = match self.decoder.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Cannot schedule refresh for undecodable token");
                return;
            }
        };

        let expires_in_ms = claims.expires_in_ms();
        let fire_in_ms = expires_in_ms - self.lead_time.as_millis() as i64;
        let delay = if fire_in_ms > 0 {
            Duration::from_millis(fire_in_ms as u64)
        } else {
            Duration::ZERO
        };

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire().await;
        });

        self.install(handle);
        debug!(
            delay_ms = delay.as_millis() as u64,
            expires_in_ms, "Refresh timer armed"
        );
    }

    /// Cancels any pending timer. Idempotent.
    pub fn cancel(&self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }

    /// Whether a timer is currently pending.
    pub fn is_armed(&self) -> bool {
        self.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn install(&self, handle: JoinHandle<()>) {
        if let Some(previous) = self.lock().replace(handle) {
            previous.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().expect("refresh timer lock poisoned")
    }
}
