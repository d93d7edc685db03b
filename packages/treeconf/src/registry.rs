//! Backend registry: backend tag → node store.

use treeconf_node_store::{InMemoryNodeStore, NodeStore};
use treeconf_zookeeper::ZooKeeperStore;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};

/// A live ZooKeeper ensemble.
pub const ZOOKEEPER: &str = "zookeeper";
/// A process-local tree that lives as long as the endpoint.
pub const MEMORY: &str = "memory";

/// Every tag [`connect_store`] accepts.
pub const BACKENDS: &[&str] = &[ZOOKEEPER, MEMORY];

/// Open the store named by `config.backend`.
pub fn connect_store(config: &EndpointConfig) -> Result<Box<dyn NodeStore>> {
    match config.backend.as_str() {
        ZOOKEEPER => {
            let store =
                ZooKeeperStore::connect(&config.hosts, config.timeout(), &config.auth_pairs())?;
            Ok(Box::new(store))
        }
        MEMORY => Ok(Box::new(InMemoryNodeStore::new())),
        other => Err(Error::UnsupportedBackend {
            tag: other.to_string(),
        }),
    }
}
