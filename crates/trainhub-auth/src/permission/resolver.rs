//! Flattens raw capability grants into the sparse map consumed by UI gating.

use super::grant::{CapabilityGrants, Grant, GrantEntry};
use super::set::PermissionSet;

/// Flattens a module's capability grants into boolean flags.
///
/// For each capability `cap`:
/// - `cap` is granted iff both `ACCESS` and `READ` are present;
/// - `cap_write` iff any of `CREATE`, `UPDATE`, `DELETE` is present;
/// - `cap_create` / `cap_update` / `cap_delete` per the respective token.
///
/// Only granted flags are inserted; everything absent denies.
pub fn flatten(capabilities: &CapabilityGrants) -> PermissionSet {
    let mut set = PermissionSet::default();

    for (capability, grants) in capabilities {
        let has = |wanted: Grant| grants.iter().any(|entry: &GrantEntry| entry.contains(wanted));

        let has_create = has(Grant::Create);
        let has_update = has(Grant::Update);
        let has_delete = has(Grant::Delete);

        if has(Grant::Access) && has(Grant::Read) {
            set.grant(capability.clone());
        }
        if has_create || has_update || has_delete {
            set.grant(format!("{capability}_write"));
        }
        if has_create {
            set.grant(format!("{capability}_create"));
        }
        if has_update {
            set.grant(format!("{capability}_update"));
        }
        if has_delete {
            set.grant(format!("{capability}_delete"));
        }
    }

    set
}
