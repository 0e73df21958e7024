use serde::{Deserialize, Serialize};
use warden_types::operation::Operation;

use crate::{permission::split_uri, role::Role};

/// A set of role IDs allowed to perform the operations in `operation`.
/// Multiple groups on one URI let different operations require different
/// role sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub operation: Operation,
    pub role_ids: Vec<i64>,
}

impl PermissionGroup {
    #[must_use]
    pub fn new(operation: Operation, role_ids: Vec<i64>) -> Self {
        Self {
            operation,
            role_ids,
        }
    }

    fn includes(&self, op: Operation) -> bool {
        self.operation.includes(op)
    }

    fn collect_role_ids(&self, op: Operation, role_ids: &mut Vec<i64>) {
        if self.includes(op) {
            role_ids.extend_from_slice(&self.role_ids);
        }
    }
}

/// A URI pattern paired with its permission groups, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardPolicy {
    pub uri: String,
    pub groups: Vec<PermissionGroup>,
}

impl StandardPolicy {
    #[must_use]
    pub fn new(uri: impl Into<String>, groups: Vec<PermissionGroup>) -> Self {
        Self {
            uri: uri.into(),
            groups,
        }
    }
}

/// Policy counterpart of the permission tree: the same segment-keyed
/// structure and traversal, but nodes carry permission groups instead of a
/// single mask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTree {
    path: String,
    groups: Vec<PermissionGroup>,
    children: Vec<PolicyTree>,
}

impl PolicyTree {
    /// An empty root with no path and no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all policies.
    pub fn load(&mut self, policies: Vec<StandardPolicy>) {
        self.clear();
        for policy in policies {
            self.insert(policy);
        }
    }

    /// Insert a policy. Intermediate nodes created along the way carry no
    /// groups; re-inserting a URI replaces the terminal node's groups.
    pub fn insert(&mut self, policy: StandardPolicy) {
        let StandardPolicy { uri, groups } = policy;
        let segments = split_uri(&uri);
        let count = segments.len();
        let mut node = self;
        for (depth, segment) in segments.into_iter().enumerate() {
            let terminal = depth + 1 == count;
            let index = match node.children.iter().position(|child| child.path == segment) {
                Some(index) => {
                    if terminal {
                        node.children[index].groups = groups.clone();
                    }
                    index
                }
                None => {
                    node.children.push(PolicyTree {
                        path: segment.to_string(),
                        groups: if terminal { groups.clone() } else { Vec::new() },
                        children: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
    }

    /// Determine whether a request for `op` on `uri` needs authorization,
    /// and if so which roles hold it.
    ///
    /// At the first matching terminal node, the role IDs of every group
    /// whose mask includes `op` are collected in stored order. A matched
    /// terminal whose groups yield nothing falls out of the walk as "no
    /// authorization required" rather than consulting broader patterns;
    /// callers wanting broader fallback model that in their policy data.
    #[must_use]
    pub fn require(&self, uri: &str, op: Operation) -> (Vec<i64>, bool) {
        let segments = split_uri(uri);
        let count = segments.len();
        let mut role_ids: Vec<i64> = Vec::new();
        let mut node = self;
        'walk: for (depth, segment) in segments.iter().enumerate() {
            let terminal = depth + 1 == count;
            for child in &node.children {
                match child.path.as_str() {
                    "**" => {
                        child.collect(op, &mut role_ids);
                        if !role_ids.is_empty() {
                            return (role_ids, true);
                        }
                    }
                    "*" => {
                        if terminal {
                            child.collect(op, &mut role_ids);
                            if !role_ids.is_empty() {
                                return (role_ids, true);
                            }
                        }
                    }
                    _ => {
                        if child.path == *segment {
                            if terminal {
                                child.collect(op, &mut role_ids);
                                if !role_ids.is_empty() {
                                    return (role_ids, true);
                                }
                            }
                            node = child;
                            continue 'walk;
                        }
                    }
                }
            }
            break;
        }
        (Vec::new(), false)
    }

    /// Whether a user holding `role` may perform `op` on `uri`. Requests
    /// that require no authorization are granted; otherwise the role's ID
    /// must appear in the required set. Ancestor-aware grants live on
    /// [`crate::access::AccessControl`].
    #[must_use]
    pub fn is_granted(&self, uri: &str, op: Operation, role: &Role) -> bool {
        let (role_ids, required) = self.require(uri, op);
        if !required {
            return true;
        }
        role_ids.contains(&role.id)
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn collect(&self, op: Operation, role_ids: &mut Vec<i64>) {
        for group in &self.groups {
            group.collect_role_ids(op, role_ids);
        }
    }
}
