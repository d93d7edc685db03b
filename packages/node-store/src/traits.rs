//! The node store capability and its option/metadata types.

use bytes::Bytes;

use crate::{Acl, NodeError, Path};

/// The version a conditional update or delete expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Version {
    /// Match whatever version the node has.
    #[default]
    Any,
    /// Match exactly this data version.
    Exact(i32),
}

impl Version {
    /// Check a node's current version against this expectation.
    pub fn matches(self, actual: i32) -> bool {
        match self {
            Version::Any => true,
            Version::Exact(expected) => expected == actual,
        }
    }

    /// The service's wire form: `-1` for any.
    pub fn as_raw(self) -> i32 {
        match self {
            Version::Any => -1,
            Version::Exact(v) => v,
        }
    }
}

/// Negative versions mean "any", as in the ZooKeeper protocol.
impl From<i32> for Version {
    fn from(v: i32) -> Self {
        if v < 0 {
            Version::Any
        } else {
            Version::Exact(v)
        }
    }
}

/// How a node is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOptions {
    /// ACL attached to the node. Empty means the backend's open default.
    pub acl: Vec<Acl>,
    /// Tie the node to the creating session.
    pub ephemeral: bool,
    /// Suffix the name with a unique, monotonically increasing counter.
    pub sequence: bool,
    /// Create missing ancestors (with empty values) first.
    pub make_intermediate_paths: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        CreateOptions {
            acl: Vec::new(),
            ephemeral: false,
            sequence: false,
            make_intermediate_paths: true,
        }
    }
}

impl CreateOptions {
    #[must_use]
    pub fn with_acl(mut self, acl: Vec<Acl>) -> Self {
        self.acl = acl;
        self
    }

    #[must_use]
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    #[must_use]
    pub fn sequence(mut self, sequence: bool) -> Self {
        self.sequence = sequence;
        self
    }

    #[must_use]
    pub fn make_intermediate_paths(mut self, make: bool) -> Self {
        self.make_intermediate_paths = make;
        self
    }

    /// Options for a missing ancestor created on behalf of these options.
    ///
    /// Ancestors share the ACL but are always persistent and never sequential.
    pub fn for_ancestor(&self) -> CreateOptions {
        CreateOptions {
            acl: self.acl.clone(),
            ephemeral: false,
            sequence: false,
            make_intermediate_paths: false,
        }
    }
}

/// Node metadata returned alongside reads and writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStat {
    /// Transaction that created the node.
    pub created_txn: i64,
    /// Transaction that last modified the node's value.
    pub modified_txn: i64,
    /// Number of value changes.
    pub version: i32,
    /// Number of changes to the child list.
    pub child_version: i32,
    pub data_length: usize,
    pub num_children: usize,
    pub ephemeral: bool,
}

/// What triggered a watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchKind {
    DataChanged,
    Deleted,
    /// Anything else the backend reports (session events, child changes).
    Other,
}

/// Delivered to a [`Watch`] when it fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: Path,
    pub kind: WatchKind,
}

/// A one-shot callback left on a node by [`NodeStore::get`].
pub type Watch = Box<dyn FnOnce(WatchEvent) + Send + 'static>;

/// A hierarchical, path-addressed node tree.
///
/// This is the whole capability treeconf needs from a coordination service.
/// Every call blocks until the service answers or the session times out.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn NodeStore>`.
pub trait NodeStore: Send {
    /// Create a node holding `value`.
    ///
    /// # Returns
    ///
    /// The path actually created. It differs from `path` only when
    /// `options.sequence` is set.
    fn create(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> Result<Path, NodeError>;

    /// Read a node's value and metadata, optionally leaving a watch on it.
    fn get(&mut self, path: &Path, watch: Option<Watch>) -> Result<(Bytes, NodeStat), NodeError>;

    /// Replace a node's value. Children are not touched.
    fn update(&mut self, path: &Path, value: &[u8], version: Version)
        -> Result<NodeStat, NodeError>;

    /// Delete a node, and with `recursive` all of its descendants.
    fn delete(&mut self, path: &Path, version: Version, recursive: bool) -> Result<(), NodeError>;

    /// Check whether a node exists.
    fn exists(&mut self, path: &Path) -> Result<bool, NodeError>;

    /// List the segments of a node's immediate children.
    ///
    /// Order is backend-defined.
    fn children(&mut self, path: &Path) -> Result<Vec<String>, NodeError>;
}

// Blanket implementations for references and boxes

impl<T: NodeStore + ?Sized> NodeStore for &mut T {
    fn create(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> Result<Path, NodeError> {
        (**self).create(path, value, options)
    }

    fn get(&mut self, path: &Path, watch: Option<Watch>) -> Result<(Bytes, NodeStat), NodeError> {
        (**self).get(path, watch)
    }

    fn update(
        &mut self,
        path: &Path,
        value: &[u8],
        version: Version,
    ) -> Result<NodeStat, NodeError> {
        (**self).update(path, value, version)
    }

    fn delete(&mut self, path: &Path, version: Version, recursive: bool) -> Result<(), NodeError> {
        (**self).delete(path, version, recursive)
    }

    fn exists(&mut self, path: &Path) -> Result<bool, NodeError> {
        (**self).exists(path)
    }

    fn children(&mut self, path: &Path) -> Result<Vec<String>, NodeError> {
        (**self).children(path)
    }
}

impl<T: NodeStore + ?Sized> NodeStore for Box<T> {
    fn create(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> Result<Path, NodeError> {
        self.as_mut().create(path, value, options)
    }

    fn get(&mut self, path: &Path, watch: Option<Watch>) -> Result<(Bytes, NodeStat), NodeError> {
        self.as_mut().get(path, watch)
    }

    fn update(
        &mut self,
        path: &Path,
        value: &[u8],
        version: Version,
    ) -> Result<NodeStat, NodeError> {
        self.as_mut().update(path, value, version)
    }

    fn delete(&mut self, path: &Path, version: Version, recursive: bool) -> Result<(), NodeError> {
        self.as_mut().delete(path, version, recursive)
    }

    fn exists(&mut self, path: &Path) -> Result<bool, NodeError> {
        self.as_mut().exists(path)
    }

    fn children(&mut self, path: &Path) -> Result<Vec<String>, NodeError> {
        self.as_mut().children(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_versions_are_any() {
        assert_eq!(Version::from(-1), Version::Any);
        assert_eq!(Version::from(-7), Version::Any);
        assert_eq!(Version::from(0), Version::Exact(0));
        assert_eq!(Version::Any.as_raw(), -1);
        assert_eq!(Version::Exact(4).as_raw(), 4);
    }

    #[test]
    fn version_matching() {
        assert!(Version::Any.matches(12));
        assert!(Version::Exact(2).matches(2));
        assert!(!Version::Exact(2).matches(3));
    }

    #[test]
    fn create_options_default_makes_paths() {
        let options = CreateOptions::default();
        assert!(options.make_intermediate_paths);
        assert!(!options.ephemeral);
        assert!(!options.sequence);
        assert!(options.acl.is_empty());
    }

    #[test]
    fn ancestor_options_are_plain_persistent() {
        let options = CreateOptions::default()
            .with_acl(vec![Acl::open_unsafe()])
            .ephemeral(true)
            .sequence(true);
        let ancestor = options.for_ancestor();
        assert_eq!(ancestor.acl, vec![Acl::open_unsafe()]);
        assert!(!ancestor.ephemeral);
        assert!(!ancestor.sequence);
    }
}
