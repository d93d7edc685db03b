//! treeconf: seed and snapshot coordination-service namespaces.
//!
//! Declarative JSON/YAML documents are imported into a hierarchical node
//! store (ZooKeeper, or an in-memory tree) and live subtrees are exported back
//! for backup, diffing or audit.
//!
//! - `ConfigEndpoint`: A node store bound to the importer, exporter and codecs
//! - `EndpointConfig`: Which backend to open and how
//! - `connect_store`: The backend registry (`"zookeeper"`, `"memory"`)
//!
//! The building blocks are re-exported from their crates:
//! `treeconf_node_store` (paths, ACLs, the `NodeStore` trait),
//! `treeconf_document` (documents and codecs) and `treeconf_tree` (the
//! import/export walks).
//!
//! # Example
//!
//! ```rust,no_run
//! use treeconf::{path, ConfigEndpoint, EndpointConfig, ImportOptions, SerializeOptions};
//!
//! let config = EndpointConfig::from_file("treeconf.yaml")?;
//! let mut endpoint = ConfigEndpoint::connect(&config)?;
//!
//! endpoint.import_from_file("seed.yaml", None, &ImportOptions::default())?;
//! endpoint.export_to_file(
//!     "snapshot.json",
//!     None,
//!     &path!("/app"),
//!     &SerializeOptions { indent: Some(2), sort_keys: true, ..Default::default() },
//! )?;
//! # Ok::<(), treeconf::Error>(())
//! ```

mod config;
mod endpoint;
mod error;
mod registry;

pub use config::{AuthConfig, EndpointConfig};
pub use endpoint::ConfigEndpoint;
pub use error::{Error, Result};
pub use registry::{connect_store, BACKENDS, MEMORY, ZOOKEEPER};

pub use treeconf_document::{
    Codec, DocumentError, DocumentMap, DocumentValue, Format, JsonCodec, MultiCodec,
    SerializeOptions, YamlCodec,
};
pub use treeconf_node_store::{
    digest_credential, path, Acl, Bytes, CreateOptions, InMemoryNodeStore, NodeError, NodeStat,
    NodeStore, Path, PathError, Perms, Version, Watch, WatchEvent, WatchKind,
};
pub use treeconf_tree::{ImportOptions, TreeExporter, TreeImporter};
pub use treeconf_zookeeper::ZooKeeperStore;
