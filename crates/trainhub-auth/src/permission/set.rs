//! Sparse permission flag map derived from workspace grants.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Flattened permission flags for the active workspace.
///
/// Only granted capabilities are present in the map. [`PermissionSet::granted`]
/// is the single lookup path and treats absence as denial, so consumers never
/// distinguish "explicitly false" from "missing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    flags: HashMap<String, bool>,
}

impl PermissionSet {
    /// Whether the given flag is granted. Absent keys deny.
    pub fn granted(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Marks a flag as granted. Flags are never explicitly set to false.
    pub(crate) fn grant(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into(), true);
    }

    /// Number of granted flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no flag is granted.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
