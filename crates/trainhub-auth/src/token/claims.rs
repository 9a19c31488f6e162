//! JWT claim payload carried by TrainHub bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permission::grant::CapabilityGrants;

/// Module key whose permission entries mark a workspace as usable.
pub const SIMULATOR_MODULE: &str = "simulator";

/// Claim payload of a TrainHub bearer token.
///
/// Besides the standard claims, the issuer embeds one block per workspace
/// the user belongs to, keyed by workspace id at the top level of the
/// payload. Those land in `extra` with their declaration order preserved;
/// [`TokenClaims::workspace_blocks`] picks them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration timestamp (seconds since epoch). Mandatory.
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Subject — the login identifier. Mandatory.
    pub sub: String,
    /// User id. Mandatory.
    pub user_id: String,
    /// Email address, when distinct from the subject.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Organizational division.
    #[serde(default)]
    pub division: Option<String>,
    /// Organizational department.
    #[serde(default)]
    pub department: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// All remaining top-level claims, in declaration order. Workspace
    /// blocks live here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Milliseconds until expiry; negative once expired.
    pub fn expires_in_ms(&self) -> i64 {
        self.exp * 1000 - Utc::now().timestamp_millis()
    }

    /// Display name assembled from the name claims.
    pub fn full_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { None } else { Some(name) }
    }

    /// All workspace blocks in claim-declaration order.
    ///
    /// A top-level claim is a workspace block when its value is an object
    /// carrying a `roles` field. Blocks that fail to parse are skipped.
    pub fn workspace_blocks(&self) -> Vec<(String, WorkspaceBlock)> {
        self.extra
            .iter()
            .filter_map(|(key, value)| {
                let object = value.as_object()?;
                if !object.contains_key("roles") {
                    return None;
                }
                match serde_json::from_value::<WorkspaceBlock>(value.clone()) {
                    Ok(block) => Some((key.clone(), block)),
                    Err(e) => {
                        tracing::debug!(
                            workspace = %key,
                            error = %e,
                            "Skipping unparseable workspace block"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/// One workspace's roles and permission grants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceBlock {
    /// Module name → list of role names.
    #[serde(default)]
    pub roles: Map<String, Value>,
    /// Module name → capability grant lists.
    #[serde(default)]
    pub permissions: Map<String, Value>,
}

impl WorkspaceBlock {
    /// Role names declared for the given module.
    pub fn module_roles(&self, module: &str) -> Vec<String> {
        self.roles
            .get(module)
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The role this workspace assigns the user: the first simulator role,
    /// else the first role of any module in key order, else nothing.
    pub fn first_role(&self) -> Option<String> {
        if let Some(role) = self.module_roles(SIMULATOR_MODULE).into_iter().next() {
            return Some(role);
        }
        for value in self.roles.values() {
            if let Some(role) = value
                .as_array()
                .and_then(|list| list.iter().find_map(|v| v.as_str()))
            {
                return Some(role.to_string());
            }
        }
        None
    }

    /// Parsed capability grants for the given module, when present.
    pub fn module_capabilities(&self, module: &str) -> Option<CapabilityGrants> {
        let value = self.permissions.get(module)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Whether `permissions.simulator` is a non-empty object.
    pub fn has_simulator_capabilities(&self) -> bool {
        self.permissions
            .get(SIMULATOR_MODULE)
            .and_then(Value::as_object)
            .is_some_and(|caps| !caps.is_empty())
    }
}
