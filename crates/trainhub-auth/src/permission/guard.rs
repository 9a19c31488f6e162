//! Route and action gating over the flattened permission map.

use std::collections::HashMap;

use trainhub_core::error::AppError;

use super::set::PermissionSet;

/// Maps console routes to the capability flag that gates them.
///
/// All checks are pure lookups with no side effects: unmapped paths and
/// absent flags deny.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    /// Route path → capability name.
    routes: HashMap<&'static str, &'static str>,
}

impl RouteGuard {
    /// Creates the default route table.
    pub fn new() -> Self {
        let routes = HashMap::from([
            ("/dashboard", "dashboard"),
            ("/training-plans", "training"),
            ("/modules", "module"),
            ("/simulations", "simulation"),
            ("/assignments", "assignment"),
            ("/teams", "team"),
            ("/tags", "tag"),
            ("/users", "user"),
        ]);
        Self { routes }
    }

    /// Whether the given route may be entered.
    pub fn allows_path(&self, permissions: &PermissionSet, path: &str) -> bool {
        self.routes
            .get(path)
            .map(|capability| permissions.granted(capability))
            .unwrap_or(false)
    }

    /// Checks route access, returning `Err(Forbidden)` when denied.
    pub fn require_path(&self, permissions: &PermissionSet, path: &str) -> Result<(), AppError> {
        if self.allows_path(permissions, path) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("Access to '{path}' is denied")))
        }
    }

    /// Whether entries of the given module may be created.
    pub fn allows_create(&self, permissions: &PermissionSet, module: &str) -> bool {
        permissions.granted(&format!("{module}_create"))
    }

    /// Whether entries of the given module may be updated.
    pub fn allows_update(&self, permissions: &PermissionSet, module: &str) -> bool {
        permissions.granted(&format!("{module}_update"))
    }

    /// Whether entries of the given module may be deleted.
    pub fn allows_delete(&self, permissions: &PermissionSet, module: &str) -> bool {
        permissions.granted(&format!("{module}_delete"))
    }

    /// Whether the given module has any write-class grant.
    pub fn allows_write(&self, permissions: &PermissionSet, module: &str) -> bool {
        permissions.granted(&format!("{module}_write"))
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}
