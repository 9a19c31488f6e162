//! # trainhub-auth
//!
//! Token decoding, workspace selection, permission resolution, and the
//! session lifecycle for the TrainHub console.
//!
//! ## Modules
//!
//! - `token` — structural JWT decoding, the claim set, and workspace selection
//! - `permission` — grant flattening, the sparse permission map, and route guards
//! - `session` — session store, proactive refresh scheduler, and the facade
//! - `user` — the user profile derived from the active token

pub mod permission;
pub mod session;
pub mod token;
pub mod user;

pub use permission::{PermissionSet, RouteGuard};
pub use session::{RefreshScheduler, SessionService, SessionStore};
pub use token::{TokenClaims, TokenDecoder, select_workspace};
pub use user::User;
