//! Active-workspace selection from a decoded claim set.

use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;

use crate::permission::grant::CapabilityGrants;

use super::claims::{SIMULATOR_MODULE, TokenClaims, WorkspaceBlock};

/// Role assigned when a workspace declares none.
pub const UNKNOWN_ROLE: &str = "Unknown";

/// The workspace a session operates in, with its role and raw grants.
#[derive(Debug, Clone)]
pub struct SelectedWorkspace {
    /// Workspace id (the claim key).
    pub workspace_id: String,
    /// The user's role within this workspace.
    pub role: String,
    /// Simulator-module capability grants; may be empty for an explicitly
    /// preferred workspace.
    pub capabilities: CapabilityGrants,
}

/// Selects the workspace a session should operate in.
///
/// An explicitly preferred workspace wins even when it carries no simulator
/// permission entries. Otherwise candidates are scanned in
/// claim-declaration order and the first with a non-empty
/// `permissions.simulator` object is chosen.
pub fn select_workspace(
    claims: &TokenClaims,
    preferred: Option<&str>,
) -> AppResult<SelectedWorkspace> {
    let candidates = claims.workspace_blocks();
    if candidates.is_empty() {
        return Err(AppError::no_workspace("Token carries no workspace block"));
    }

    if let Some(wanted) = preferred {
        if let Some((id, block)) = candidates.iter().find(|(id, _)| id == wanted) {
            return Ok(build_selection(id, block));
        }
    }

    candidates
        .iter()
        .find(|(_, block)| block.has_simulator_capabilities())
        .map(|(id, block)| build_selection(id, block))
        .ok_or_else(|| {
            AppError::no_valid_workspace("No workspace carries simulator permission entries")
        })
}

fn build_selection(id: &str, block: &WorkspaceBlock) -> SelectedWorkspace {
    SelectedWorkspace {
        workspace_id: id.to_string(),
        role: block
            .first_role()
            .unwrap_or_else(|| UNKNOWN_ROLE.to_string()),
        capabilities: block
            .module_capabilities(SIMULATOR_MODULE)
            .unwrap_or_default(),
    }
}
