//! In-memory node store.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;

use crate::{
    Acl, CreateOptions, NodeError, NodeStat, NodeStore, Path, Version, Watch, WatchEvent,
    WatchKind, MAX_VALUE_SIZE,
};

struct Node {
    value: Bytes,
    stat: NodeStat,
    acl: Vec<Acl>,
    children: BTreeSet<String>,
}

impl Node {
    fn new(value: Bytes, acl: Vec<Acl>, txn: i64, ephemeral: bool) -> Self {
        Node {
            stat: NodeStat {
                created_txn: txn,
                modified_txn: txn,
                data_length: value.len(),
                ephemeral,
                ..NodeStat::default()
            },
            value,
            acl,
            children: BTreeSet::new(),
        }
    }
}

/// A node tree held in process memory, behaving like a single session
/// against a coordination service.
///
/// ACLs are recorded but not enforced. Children are listed in sorted order.
///
/// # Example
///
/// ```rust
/// use treeconf_node_store::{path, CreateOptions, InMemoryNodeStore, NodeStore, Version};
///
/// let mut store = InMemoryNodeStore::new();
///
/// // Intermediate nodes are created on demand by default
/// store.create(&path!("/a/b"), b"x", &CreateOptions::default()).unwrap();
/// assert!(store.exists(&path!("/a")).unwrap());
///
/// store.update(&path!("/a/b"), b"y", Version::Any).unwrap();
/// let (value, stat) = store.get(&path!("/a/b"), None).unwrap();
/// assert_eq!(&value[..], b"y");
/// assert_eq!(stat.version, 1);
/// ```
pub struct InMemoryNodeStore {
    nodes: BTreeMap<Path, Node>,
    last_txn: i64,
    watches: Vec<(Path, Watch)>,
}

impl InMemoryNodeStore {
    /// Create a store holding only the root node.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Path::root(), Node::new(Bytes::new(), Vec::new(), 0, false));
        Self {
            nodes,
            last_txn: 0,
            watches: Vec::new(),
        }
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root remains.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The ACL a node was created with.
    pub fn acl(&self, path: &Path) -> Option<&[Acl]> {
        self.nodes.get(path).map(|node| node.acl.as_slice())
    }

    /// End the session: every ephemeral node is removed.
    pub fn expire_session(&mut self) {
        let ephemeral: Vec<Path> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.stat.ephemeral)
            .map(|(path, _)| path.clone())
            .collect();
        tracing::debug!(count = ephemeral.len(), "expiring session");
        for path in ephemeral {
            self.remove_node(&path);
        }
    }

    fn next_txn(&mut self) -> i64 {
        self.last_txn += 1;
        self.last_txn
    }

    fn node(&self, path: &Path) -> Result<&Node, NodeError> {
        self.nodes.get(path).ok_or_else(|| NodeError::NoSuchNode {
            path: path.clone(),
        })
    }

    fn check_size(path: &Path, value: &[u8]) -> Result<(), NodeError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(NodeError::ValueTooLarge {
                path: path.clone(),
                size: value.len(),
            });
        }
        Ok(())
    }

    fn check_version(path: &Path, node: &Node, version: Version) -> Result<(), NodeError> {
        if !version.matches(node.stat.version) {
            return Err(NodeError::BadVersion {
                path: path.clone(),
                expected: version.as_raw(),
                actual: node.stat.version,
            });
        }
        Ok(())
    }

    /// Insert a node under an existing, non-ephemeral parent.
    fn insert_child(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> Result<Path, NodeError> {
        let parent_path = path.parent().ok_or_else(|| NodeError::NodeExists {
            path: path.clone(),
        })?;
        let parent = self
            .nodes
            .get(&parent_path)
            .ok_or_else(|| NodeError::NoSuchParent { path: path.clone() })?;
        if parent.stat.ephemeral {
            return Err(NodeError::NoChildrenForEphemerals { path: parent_path });
        }

        let actual = match (options.sequence, path.name()) {
            (true, Some(name)) => {
                parent_path.child(&format!("{}{:010}", name, parent.stat.child_version))?
            }
            _ => path.clone(),
        };
        if self.nodes.contains_key(&actual) {
            return Err(NodeError::NodeExists { path: actual });
        }

        let txn = self.next_txn();
        let node = Node::new(
            Bytes::copy_from_slice(value),
            options.acl.clone(),
            txn,
            options.ephemeral,
        );
        self.nodes.insert(actual.clone(), node);

        if let (Some(parent), Some(name)) = (self.nodes.get_mut(&parent_path), actual.name()) {
            parent.children.insert(name.to_string());
            parent.stat.child_version += 1;
            parent.stat.num_children = parent.children.len();
        }
        Ok(actual)
    }

    /// Remove one node (assumed childless) and fire its watches.
    fn remove_node(&mut self, path: &Path) {
        if self.nodes.remove(path).is_none() {
            return;
        }
        if let (Some(parent_path), Some(name)) = (path.parent(), path.name()) {
            if let Some(parent) = self.nodes.get_mut(&parent_path) {
                parent.children.remove(name);
                parent.stat.child_version += 1;
                parent.stat.num_children = parent.children.len();
            }
        }
        self.fire(path, WatchKind::Deleted);
    }

    fn fire(&mut self, path: &Path, kind: WatchKind) {
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.watches)
            .into_iter()
            .partition(|(watched, _)| watched == path);
        self.watches = kept;
        for (path, watch) in fired {
            watch(WatchEvent { path, kind });
        }
    }
}

impl Default for InMemoryNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for InMemoryNodeStore {
    fn create(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> Result<Path, NodeError> {
        Self::check_size(path, value)?;

        if options.make_intermediate_paths {
            let ancestor_options = options.for_ancestor();
            for ancestor in path.ancestors() {
                if !self.nodes.contains_key(&ancestor) {
                    self.insert_child(&ancestor, b"", &ancestor_options)?;
                }
            }
        }

        let created = self.insert_child(path, value, options)?;
        tracing::debug!(path = %created, "created node");
        Ok(created)
    }

    fn get(&mut self, path: &Path, watch: Option<Watch>) -> Result<(Bytes, NodeStat), NodeError> {
        let node = self.node(path)?;
        let result = (node.value.clone(), node.stat.clone());
        if let Some(watch) = watch {
            self.watches.push((path.clone(), watch));
        }
        Ok(result)
    }

    fn update(
        &mut self,
        path: &Path,
        value: &[u8],
        version: Version,
    ) -> Result<NodeStat, NodeError> {
        Self::check_size(path, value)?;
        Self::check_version(path, self.node(path)?, version)?;

        let txn = self.next_txn();
        let stat = match self.nodes.get_mut(path) {
            Some(node) => {
                node.value = Bytes::copy_from_slice(value);
                node.stat.version += 1;
                node.stat.modified_txn = txn;
                node.stat.data_length = value.len();
                node.stat.clone()
            }
            None => return Err(NodeError::NoSuchNode { path: path.clone() }),
        };

        self.fire(path, WatchKind::DataChanged);
        Ok(stat)
    }

    fn delete(&mut self, path: &Path, version: Version, recursive: bool) -> Result<(), NodeError> {
        let node = self.node(path)?;
        Self::check_version(path, node, version)?;

        if !node.children.is_empty() && !recursive {
            return Err(NodeError::NotEmpty { path: path.clone() });
        }
        if path.is_root() {
            return Err(NodeError::AccessDenied { path: path.clone() });
        }

        // Deepest first, so every removal sees a childless node
        let mut doomed: Vec<Path> = self
            .nodes
            .keys()
            .filter(|candidate| candidate.has_prefix(path))
            .cloned()
            .collect();
        doomed.sort_by_key(|p| std::cmp::Reverse(p.len()));

        tracing::debug!(path = %path, count = doomed.len(), "deleting nodes");
        for doomed_path in doomed {
            self.remove_node(&doomed_path);
        }
        Ok(())
    }

    fn exists(&mut self, path: &Path) -> Result<bool, NodeError> {
        Ok(self.nodes.contains_key(path))
    }

    fn children(&mut self, path: &Path) -> Result<Vec<String>, NodeError> {
        Ok(self.node(path)?.children.iter().cloned().collect())
    }
}
