use serde::{Deserialize, Serialize};
use warden_types::operation::Operation;

/// Split a URI into its path segments. One leading empty segment (the
/// customary leading `/`) and one trailing empty segment (a trailing slash)
/// are dropped; the result may be empty.
#[must_use]
pub fn split_uri(uri: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = uri.split('/').collect();
    if segments.first() == Some(&"") {
        segments.remove(0);
    }
    if segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

/// A URI pattern paired with the operations it allows.
///
/// Patterns are `/`-delimited. Two segments have distinguished meaning:
/// `*` matches exactly one segment in the final position, `**` matches one
/// or more trailing segments. A pattern without wildcards matches only its
/// exact path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardPermission {
    pub uri: String,
    pub operation: Operation,
}

impl StandardPermission {
    #[must_use]
    pub fn new(uri: impl Into<String>, operation: Operation) -> Self {
        Self {
            uri: uri.into(),
            operation,
        }
    }

    /// Whether `uri` matches this permission's pattern.
    #[must_use]
    pub fn matches(&self, uri: &str) -> bool {
        if self.uri == uri {
            return true;
        }

        if self.uri.contains("/**") {
            let matcher = self.uri.replace("/**", "");
            return uri.starts_with(&matcher);
        }

        if self.uri.contains("/*") {
            let matcher = self.uri.replace("/*", "");
            return match uri.rfind('/') {
                Some(index) => uri[..index] == matcher,
                None => false,
            };
        }
        false
    }

    /// Whether `op` is included in this permission's operation mask.
    #[must_use]
    pub fn includes(&self, op: Operation) -> bool {
        self.operation.includes(op)
    }
}

/// Flat permission container: an ordered sequence scanned linearly. The
/// first entry whose pattern matches and whose mask includes the queried
/// operation decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionList(Vec<StandardPermission>);

impl PermissionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all entries.
    pub fn load(&mut self, permissions: Vec<StandardPermission>) {
        self.0 = permissions;
    }

    pub fn push(&mut self, permission: StandardPermission) {
        self.0.push(permission);
    }

    #[must_use]
    pub fn has_permission(&self, uri: &str, op: Operation) -> bool {
        self.0
            .iter()
            .any(|permission| permission.matches(uri) && permission.includes(op))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Radix-style permission container keyed by path segment.
///
/// Children keep insertion order, and the first child that produces a
/// decisive answer ends a lookup, so the behavior matches the flat list for
/// corresponding inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTree {
    path: String,
    operation: Operation,
    children: Vec<PermissionTree>,
}

impl Default for PermissionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionTree {
    /// An empty root with no path and no operations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: String::new(),
            operation: Operation::empty(),
            children: Vec::new(),
        }
    }

    /// Replace all entries.
    pub fn load(&mut self, permissions: Vec<StandardPermission>) {
        self.clear();
        for permission in &permissions {
            self.insert(permission);
        }
    }

    /// Insert a pattern. Intermediate nodes created along the way carry an
    /// empty mask; only the terminal node carries the pattern's mask.
    /// Re-inserting a pattern overwrites the terminal mask.
    pub fn insert(&mut self, permission: &StandardPermission) {
        let segments = split_uri(&permission.uri);
        let count = segments.len();
        let mut node = self;
        for (depth, segment) in segments.into_iter().enumerate() {
            let terminal = depth + 1 == count;
            let index = match node.children.iter().position(|child| child.path == segment) {
                Some(index) => {
                    if terminal {
                        node.children[index].operation = permission.operation;
                    }
                    index
                }
                None => {
                    node.children.push(PermissionTree {
                        path: segment.to_string(),
                        operation: if terminal {
                            permission.operation
                        } else {
                            Operation::empty()
                        },
                        children: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
    }

    /// Whether any inserted pattern matches `uri`, regardless of operation.
    #[must_use]
    pub fn matches(&self, uri: &str) -> bool {
        let segments = split_uri(uri);
        let count = segments.len();
        let mut node = self;
        'walk: for (depth, segment) in segments.iter().enumerate() {
            let terminal = depth + 1 == count;
            for child in &node.children {
                match child.path.as_str() {
                    "**" => return true,
                    "*" => {
                        if terminal {
                            return true;
                        }
                    }
                    _ => {
                        if child.path == *segment {
                            if terminal {
                                return true;
                            }
                            node = child;
                            continue 'walk;
                        }
                    }
                }
            }
            break;
        }
        false
    }

    /// Whether an inserted pattern matches `uri` and its mask includes `op`.
    #[must_use]
    pub fn has_permission(&self, uri: &str, op: Operation) -> bool {
        let segments = split_uri(uri);
        let count = segments.len();
        let mut node = self;
        'walk: for (depth, segment) in segments.iter().enumerate() {
            let terminal = depth + 1 == count;
            for child in &node.children {
                match child.path.as_str() {
                    // A `**` child stands for all remaining segments and
                    // decides immediately.
                    "**" => return child.operation.includes(op),
                    // A `*` child consumes exactly the final segment.
                    "*" => {
                        if terminal {
                            return child.operation.includes(op);
                        }
                    }
                    _ => {
                        if child.path == *segment {
                            if terminal {
                                return child.operation.includes(op);
                            }
                            node = child;
                            continue 'walk;
                        }
                    }
                }
            }
            break;
        }
        false
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// The two interchangeable permission representations behind one contract.
/// Behavior is equivalent for all inputs, modulo the documented insertion
/// order tie-breaking of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionSet {
    List(PermissionList),
    Tree(PermissionTree),
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::List(PermissionList::new())
    }
}

impl PermissionSet {
    pub fn load(&mut self, permissions: Vec<StandardPermission>) {
        match self {
            Self::List(list) => list.load(permissions),
            Self::Tree(tree) => tree.load(permissions),
        }
    }

    #[must_use]
    pub fn has_permission(&self, uri: &str, op: Operation) -> bool {
        match self {
            Self::List(list) => list.has_permission(uri, op),
            Self::Tree(tree) => tree.has_permission(uri, op),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::List(list) => list.clear(),
            Self::Tree(tree) => tree.clear(),
        }
    }
}
