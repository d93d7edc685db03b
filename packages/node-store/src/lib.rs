//! treeconf node store: the coordination-service capability.
//!
//! This crate describes the small surface treeconf needs from a hierarchical
//! coordination service such as ZooKeeper:
//! - `Path`: Validated absolute node path (`/a/b/c`)
//! - `NodeStore`: create/get/update/delete/exists/children on nodes
//! - `Acl`: Access-control descriptors handed through to the service
//! - `InMemoryNodeStore`: A process-local store with the same semantics
//!
//! Backends live in their own crates and implement `NodeStore`.
//!
//! # Example
//!
//! ```rust
//! use treeconf_node_store::{path, CreateOptions, InMemoryNodeStore, NodeStore};
//!
//! let mut store = InMemoryNodeStore::new();
//! store
//!     .create(&path!("/app/name"), b"demo", &CreateOptions::default())
//!     .unwrap();
//!
//! let (value, _stat) = store.get(&path!("/app/name"), None).unwrap();
//! assert_eq!(&value[..], b"demo");
//! ```

pub use bytes::Bytes;

mod acl;
mod error;
mod in_memory;
mod path;
mod traits;

pub use acl::{digest_credential, Acl, Perms};
pub use error::{NodeError, MAX_VALUE_SIZE};
pub use in_memory::InMemoryNodeStore;
pub use path::{Path, PathError};
pub use traits::{
    CreateOptions, NodeStat, NodeStore, Version, Watch, WatchEvent, WatchKind,
};
