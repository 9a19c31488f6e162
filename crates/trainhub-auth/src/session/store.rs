//! In-process session state with atomic whole-snapshot replacement.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::user::User;

/// The replaceable portion of the session state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Current bearer token.
    pub token: Option<String>,
    /// Decoded expiry of the token, kept alongside it for point-in-time
    /// authentication checks.
    pub expires_at: Option<DateTime<Utc>>,
    /// User derived from the token. Non-null iff the token decoded.
    pub user: Option<User>,
    /// Selected workspace id.
    pub workspace_id: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    epoch: u64,
    snapshot: SessionSnapshot,
}

/// Holds the current bearer token and derived user state.
///
/// All mutation is whole-snapshot replacement under a single write lock;
/// fields are never updated piecemeal. The epoch advances on every clear,
/// so an asynchronous result applied with [`SessionStore::apply_if_current`]
/// detects that it lost the race against a logout.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current epoch.
    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// Replaces the snapshot only when the epoch still matches `expected`.
    ///
    /// Returns `false` (leaving the state untouched) when the session was
    /// cleared after `expected` was captured.
    pub fn apply_if_current(&self, expected: u64, snapshot: SessionSnapshot) -> bool {
        let mut state = self.write();
        if state.epoch != expected {
            return false;
        }
        state.snapshot = snapshot;
        true
    }

    /// Unconditionally replaces the snapshot (interactive login).
    pub fn replace(&self, snapshot: SessionSnapshot) {
        self.write().snapshot = snapshot;
    }

    /// Clears all session state and advances the epoch. Idempotent.
    pub fn clear(&self) {
        let mut state = self.write();
        state.epoch += 1;
        state.snapshot = SessionSnapshot::default();
    }

    /// The current bearer token.
    pub fn token(&self) -> Option<String> {
        self.read().snapshot.token.clone()
    }

    /// The current user profile.
    pub fn user(&self) -> Option<User> {
        self.read().snapshot.user.clone()
    }

    /// The selected workspace id.
    pub fn workspace_id(&self) -> Option<String> {
        self.read().snapshot.workspace_id.clone()
    }

    /// Point-in-time check: a token is present and not yet expired.
    pub fn is_token_valid(&self) -> bool {
        let state = self.read();
        state.snapshot.token.is_some()
            && state
                .snapshot
                .expires_at
                .is_some_and(|expires_at| expires_at > Utc::now())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().expect("session state lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().expect("session state lock poisoned")
    }
}
