//! Error types for node store operations.

use crate::path::{Path, PathError};

/// Largest value a node may hold (1 MiB), matching ZooKeeper's default
/// `jute.maxbuffer`.
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

/// Errors returned by a [`NodeStore`](crate::NodeStore).
///
/// Every variant that concerns a specific node names it, so a failed walk
/// over a tree can always report where it stopped.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The node does not exist.
    #[error("no node at {path}")]
    NoSuchNode { path: Path },

    /// The node already exists.
    #[error("node {path} already exists")]
    NodeExists { path: Path },

    /// The parent of a node being created does not exist.
    #[error("parent of {path} does not exist")]
    NoSuchParent { path: Path },

    /// A conditional update or delete saw a different version.
    #[error("version mismatch at {path}: expected {expected}, found {actual}")]
    BadVersion {
        path: Path,
        expected: i32,
        actual: i32,
    },

    /// A non-recursive delete hit a node with children.
    #[error("node {path} has children")]
    NotEmpty { path: Path },

    /// The value exceeds [`MAX_VALUE_SIZE`].
    #[error("value for {path} is {size} bytes, limit is {}", MAX_VALUE_SIZE)]
    ValueTooLarge { path: Path, size: usize },

    /// Ephemeral nodes cannot have children.
    #[error("ephemeral node {path} cannot have children")]
    NoChildrenForEphemerals { path: Path },

    /// The session lacks permission for the node.
    #[error("access to {path} denied")]
    AccessDenied { path: Path },

    /// The path could not be built.
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// A child segment below `parent` could not be turned into a path.
    #[error("invalid path below {parent}: {source}")]
    InvalidChild {
        parent: Path,
        #[source]
        source: PathError,
    },

    /// Connection, session or protocol failure.
    ///
    /// Use this for anything the coordination service reports that is not
    /// about the state of a particular node. `path` is the node being
    /// worked on when the failure happened, if known.
    #[error(
        "transport error{}: {source}",
        path.as_ref().map(|p| format!(" at {}", p)).unwrap_or_default()
    )]
    Transport {
        path: Option<Path>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl NodeError {
    /// Wrap any error as a transport failure.
    pub fn transport(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        NodeError::Transport {
            path: None,
            source: error.into(),
        }
    }

    /// Attach the node being worked on to an error that does not name one.
    ///
    /// Transport failures get `path`, and a bare `InvalidPath` becomes
    /// `InvalidChild` below `path`. Errors that already name a node are
    /// returned unchanged.
    #[must_use]
    pub fn at(self, path: &Path) -> Self {
        match self {
            NodeError::Transport { path: None, source } => NodeError::Transport {
                path: Some(path.clone()),
                source,
            },
            NodeError::InvalidPath(source) => NodeError::InvalidChild {
                parent: path.clone(),
                source,
            },
            other => other,
        }
    }

    /// The node the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            NodeError::NoSuchNode { path }
            | NodeError::NodeExists { path }
            | NodeError::NoSuchParent { path }
            | NodeError::BadVersion { path, .. }
            | NodeError::NotEmpty { path }
            | NodeError::ValueTooLarge { path, .. }
            | NodeError::NoChildrenForEphemerals { path }
            | NodeError::AccessDenied { path } => Some(path),
            NodeError::InvalidChild { parent, .. } => Some(parent),
            NodeError::Transport { path, .. } => path.as_ref(),
            NodeError::InvalidPath(_) => None,
        }
    }
}
