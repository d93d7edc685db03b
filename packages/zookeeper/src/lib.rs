//! ZooKeeper backend for treeconf.
//!
//! `ZooKeeperStore` implements [`NodeStore`](treeconf_node_store::NodeStore)
//! over a single ZooKeeper session using the `zookeeper` client crate. Calls
//! block until the ensemble answers.
//!
//! Errors about a node (missing, exists, version, ACL) map to the matching
//! `NodeError` variant; connection and session failures become
//! `NodeError::Transport`.

mod convert;
mod store;

pub use store::ZooKeeperStore;
