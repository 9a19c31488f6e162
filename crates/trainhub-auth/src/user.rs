//! User profile derived from the active token.

use serde::{Deserialize, Serialize};

use crate::permission::resolver::flatten;
use crate::permission::set::PermissionSet;
use crate::token::claims::TokenClaims;
use crate::token::workspace::SelectedWorkspace;

/// The authenticated user as derived from the current bearer token.
///
/// Immutable once constructed; every decode replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id from the `user_id` claim.
    pub id: String,
    /// Email address; falls back to the subject claim.
    pub email: String,
    /// Display name; falls back to the subject claim.
    pub name: String,
    /// Role within the selected workspace.
    pub role: String,
    /// Organizational division.
    pub division: Option<String>,
    /// Organizational department.
    pub department: Option<String>,
    /// Avatar URL.
    pub profile_image_url: Option<String>,
    /// The workspace this profile was derived for.
    pub workspace_id: String,
    /// Flattened simulator permissions for the workspace.
    pub permissions: PermissionSet,
}

impl User {
    /// Builds the profile for a decoded token and its selected workspace.
    pub fn from_claims(claims: &TokenClaims, selection: &SelectedWorkspace) -> Self {
        Self {
            id: claims.user_id.clone(),
            email: claims.email.clone().unwrap_or_else(|| claims.sub.clone()),
            name: claims.full_name().unwrap_or_else(|| claims.sub.clone()),
            role: selection.role.clone(),
            division: claims.division.clone(),
            department: claims.department.clone(),
            profile_image_url: claims.profile_image_url.clone(),
            workspace_id: selection.workspace_id.clone(),
            permissions: flatten(&selection.capabilities),
        }
    }
}
