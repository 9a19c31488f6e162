//! Permission grants, flattening, and route/action gating.

pub mod grant;
pub mod guard;
pub mod resolver;
pub mod set;

pub use grant::{CapabilityGrants, Grant, GrantEntry};
pub use guard::RouteGuard;
pub use resolver::flatten;
pub use set::PermissionSet;
