use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use warden_types::operation::Operation;

use crate::permission::PermissionSet;

/// Sentinel parent ID for roles at the top of their tree.
pub const NO_PARENT: i64 = 0;

/// A role in the hierarchy. `parent_id` links roles into a forest; a role's
/// own permission set is consulted independently of the policy engine's
/// role-ID-driven decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub parent_id: i64,
}

impl Role {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions: PermissionSet::default(),
            parent_id: NO_PARENT,
        }
    }

    #[must_use]
    pub fn with_parent(id: i64, name: impl Into<String>, parent_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            permissions: PermissionSet::default(),
            parent_id,
        }
    }

    #[must_use]
    pub fn has_permission(&self, uri: &str, op: Operation) -> bool {
        self.permissions.has_permission(uri, op)
    }

    #[must_use]
    pub fn is_parent_of(&self, other: &Role) -> bool {
        self.id == other.parent_id
    }

    #[must_use]
    pub fn is_child_of(&self, other: &Role) -> bool {
        self.parent_id == other.id
    }
}

/// Concurrent registry of roles keyed by ID. Lookups and registrations are
/// lock-free from the caller's perspective.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    roles: DashMap<i64, Role>,
}

impl RoleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a role by its ID.
    pub fn set_role(&self, role: Role) {
        self.roles.insert(role.id, role);
    }

    pub fn load_roles(&self, roles: Vec<Role>) {
        for role in roles {
            self.set_role(role);
        }
    }

    #[must_use]
    pub fn get_role(&self, id: i64) -> Option<Role> {
        self.roles.get(&id).map(|role| role.value().clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Whether `superior` is an ancestor of `subordinate` in the role
    /// forest. A role is never superior to itself. The parent-chain walk is
    /// bounded by the registry size, so cyclic parent data terminates with
    /// `false` instead of looping.
    #[must_use]
    pub fn is_superior(&self, superior: i64, subordinate: i64) -> bool {
        let Some(mut current) = self.get_role(subordinate) else {
            return false;
        };
        for _ in 0..self.roles.len() {
            let Some(parent) = self.get_role(current.parent_id) else {
                return false;
            };
            if parent.id == superior {
                return true;
            }
            current = parent;
        }
        false
    }
}
