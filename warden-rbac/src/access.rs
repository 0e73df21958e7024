use parking_lot::RwLock;
use warden_types::operation::Operation;

use crate::{
    policy::{PolicyTree, StandardPolicy},
    role::{Role, RoleRegistry},
};

/// Process-wide access control state: the policy tree behind a
/// reader-writer lock and the concurrent role registry.
///
/// Policies are loaded at startup and may be hot-reloaded; a reload swaps in
/// a fully-built tree under the write lock, so in-flight lookups never
/// observe a partially-constructed tree, and a `load_policies` that has
/// returned is visible to every subsequent lookup. No lookup holds the lock
/// across external I/O.
#[derive(Debug, Default)]
pub struct AccessControl {
    policies: RwLock<PolicyTree>,
    roles: RoleRegistry,
}

impl AccessControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active policies. Concurrent loads serialize; the last
    /// writer wins.
    #[tracing::instrument(skip_all, fields(policies = policies.len()))]
    pub fn load_policies(&self, policies: Vec<StandardPolicy>) {
        let mut tree = PolicyTree::new();
        for policy in policies {
            tree.insert(policy);
        }
        *self.policies.write() = tree;
    }

    /// Whether authorization is required for `op` on `uri`, and the roles
    /// that hold it. See [`PolicyTree::require`].
    #[must_use]
    pub fn require(&self, uri: &str, op: Operation) -> (Vec<i64>, bool) {
        self.policies.read().require(uri, op)
    }

    /// Whether a user holding `role` may perform `op` on `uri`.
    ///
    /// Ancestor-aware: the role is granted when its ID appears in the
    /// required set, or when it is superior to any required role in the
    /// registry, so parent roles inherit access required of their
    /// descendants.
    #[must_use]
    pub fn is_granted(&self, uri: &str, op: Operation, role: &Role) -> bool {
        let (role_ids, required) = self.require(uri, op);
        if !required {
            return true;
        }
        role_ids
            .iter()
            .any(|&id| id == role.id || self.roles.is_superior(role.id, id))
    }

    pub fn set_role(&self, role: Role) {
        self.roles.set_role(role);
    }

    pub fn load_roles(&self, roles: Vec<Role>) {
        self.roles.load_roles(roles);
    }

    #[must_use]
    pub fn get_role(&self, id: i64) -> Option<Role> {
        self.roles.get_role(id)
    }

    #[must_use]
    pub fn is_superior(&self, superior: i64, subordinate: i64) -> bool {
        self.roles.is_superior(superior, subordinate)
    }

    #[must_use]
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }
}
