//! Typed capability grant tokens as carried in workspace claims.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single grant token issued for a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grant {
    /// The capability's surface may be entered at all.
    Access,
    /// Read the capability's data.
    Read,
    /// Create new entries.
    Create,
    /// Update existing entries.
    Update,
    /// Delete entries.
    Delete,
}

/// One entry of a capability's grant list.
///
/// Grant lists are arrays of tokens, occasionally with one extra level of
/// nesting. Anything else — unknown tokens, deeper structures — lands in
/// `Unknown` and never grants anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantEntry {
    /// A bare grant token.
    Token(Grant),
    /// A nested list of grant tokens.
    Nested(Vec<GrantEntry>),
    /// Anything unrecognized; treated as granting nothing.
    Unknown(serde_json::Value),
}

impl GrantEntry {
    /// Whether this entry carries `wanted`, directly or one level nested.
    pub fn contains(&self, wanted: Grant) -> bool {
        match self {
            Self::Token(grant) => *grant == wanted,
            Self::Nested(inner) => inner
                .iter()
                .any(|entry| matches!(entry, Self::Token(grant) if *grant == wanted)),
            Self::Unknown(_) => false,
        }
    }
}

/// Capability name → grant list, as carried by one module's permission block.
pub type CapabilityGrants = HashMap<String, Vec<GrantEntry>>;
