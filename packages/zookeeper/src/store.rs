use std::time::Duration;

use bytes::Bytes;
use zookeeper::{CreateMode, WatchedEvent, Watcher, ZkError, ZooKeeper};

use treeconf_node_store::{
    CreateOptions, NodeError, NodeStat, NodeStore, Path, Version, Watch, MAX_VALUE_SIZE,
};

use crate::convert::{create_mode, map_error, one_shot_watcher, to_node_stat, to_zk_acls};

/// Logs session state changes.
struct SessionWatcher;

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        tracing::debug!(state = ?event.keeper_state, path = ?event.path, "session event");
    }
}

/// A [`NodeStore`] backed by one ZooKeeper session.
///
/// The session is opened by [`ZooKeeperStore::connect`] and closed when the
/// store is dropped. Ephemeral nodes created through it live as long as the
/// session does. An expired session is not re-established; every later call
/// fails with [`NodeError::Transport`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use treeconf_node_store::{path, CreateOptions, NodeStore};
/// use treeconf_zookeeper::ZooKeeperStore;
///
/// let mut store = ZooKeeperStore::connect("127.0.0.1:2181", Duration::from_secs(10), &[])?;
/// store.create(&path!("/app/name"), b"demo", &CreateOptions::default())?;
/// ```
pub struct ZooKeeperStore {
    client: ZooKeeper,
    hosts: String,
}

impl ZooKeeperStore {
    /// Open a session against `hosts` (a comma-separated `host:port` list).
    ///
    /// Each `(scheme, credential)` in `auth` is added to the session before it
    /// is returned, e.g. `("digest", b"user:password".to_vec())`.
    pub fn connect(
        hosts: &str,
        timeout: Duration,
        auth: &[(String, Vec<u8>)],
    ) -> Result<Self, NodeError> {
        let client =
            ZooKeeper::connect(hosts, timeout, SessionWatcher).map_err(NodeError::transport)?;
        tracing::info!(hosts, ?timeout, "connected to zookeeper");

        let store = ZooKeeperStore {
            client,
            hosts: hosts.to_string(),
        };
        for (scheme, credential) in auth {
            store.add_auth(scheme, credential.clone())?;
        }
        Ok(store)
    }

    /// Add credentials to the session.
    pub fn add_auth(&self, scheme: &str, credential: Vec<u8>) -> Result<(), NodeError> {
        self.client
            .add_auth(scheme, credential)
            .map_err(NodeError::transport)?;
        tracing::debug!(scheme, "added session auth");
        Ok(())
    }

    /// The connect string this store was opened with.
    pub fn hosts(&self) -> &str {
        &self.hosts
    }

    fn bad_version(&self, path: &Path, expected: Version) -> NodeError {
        let actual = match self.client.exists(&path.to_string(), false) {
            Ok(Some(stat)) => stat.version,
            _ => -1,
        };
        NodeError::BadVersion {
            path: path.clone(),
            expected: expected.as_raw(),
            actual,
        }
    }

    fn create_ancestors(&self, path: &Path, options: &CreateOptions) -> Result<(), NodeError> {
        let acl = to_zk_acls(&options.for_ancestor().acl);
        for ancestor in path.ancestors() {
            match self.client.create(
                &ancestor.to_string(),
                Vec::new(),
                acl.clone(),
                CreateMode::Persistent,
            ) {
                Ok(_) => tracing::debug!(path = %ancestor, "created intermediate node"),
                Err(ZkError::NodeExists) => {}
                Err(error) => return Err(map_error(&ancestor, error)),
            }
        }
        Ok(())
    }

    /// Remove the descendants of `path`, deepest first.
    fn delete_descendants(&self, path: &Path) -> Result<(), NodeError> {
        let children = match self.client.get_children(&path.to_string(), false) {
            Ok(children) => children,
            Err(ZkError::NoNode) => return Ok(()),
            Err(error) => return Err(map_error(path, error)),
        };
        for child in children {
            let child_path = path.child(&child)?;
            self.delete_descendants(&child_path)?;
            match self.client.delete(&child_path.to_string(), None) {
                Ok(()) | Err(ZkError::NoNode) => {}
                Err(error) => return Err(map_error(&child_path, error)),
            }
        }
        Ok(())
    }
}

impl NodeStore for ZooKeeperStore {
    fn create(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> Result<Path, NodeError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(NodeError::ValueTooLarge {
                path: path.clone(),
                size: value.len(),
            });
        }
        if options.make_intermediate_paths {
            self.create_ancestors(path, options)?;
        }

        let created = self
            .client
            .create(
                &path.to_string(),
                value.to_vec(),
                to_zk_acls(&options.acl),
                create_mode(options),
            )
            .map_err(|error| match error {
                ZkError::NoNode => NodeError::NoSuchParent { path: path.clone() },
                other => map_error(path, other),
            })?;
        tracing::debug!(path = %created, "created node");
        Ok(Path::parse(&created)?)
    }

    fn get(&mut self, path: &Path, watch: Option<Watch>) -> Result<(Bytes, NodeStat), NodeError> {
        let raw = path.to_string();
        let result = match watch {
            Some(watch) => self.client.get_data_w(&raw, one_shot_watcher(path.clone(), watch)),
            None => self.client.get_data(&raw, false),
        };
        let (value, stat) = result.map_err(|error| map_error(path, error))?;
        Ok((Bytes::from(value), to_node_stat(&stat)))
    }

    fn update(
        &mut self,
        path: &Path,
        value: &[u8],
        version: Version,
    ) -> Result<NodeStat, NodeError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(NodeError::ValueTooLarge {
                path: path.clone(),
                size: value.len(),
            });
        }
        let expected = match version {
            Version::Any => None,
            Version::Exact(v) => Some(v),
        };
        let stat = self
            .client
            .set_data(&path.to_string(), value.to_vec(), expected)
            .map_err(|error| match error {
                ZkError::BadVersion => self.bad_version(path, version),
                other => map_error(path, other),
            })?;
        Ok(to_node_stat(&stat))
    }

    fn delete(&mut self, path: &Path, version: Version, recursive: bool) -> Result<(), NodeError> {
        if path.is_root() {
            return Err(NodeError::AccessDenied { path: path.clone() });
        }
        if recursive {
            self.delete_descendants(path)?;
        }
        let expected = match version {
            Version::Any => None,
            Version::Exact(v) => Some(v),
        };
        self.client
            .delete(&path.to_string(), expected)
            .map_err(|error| match error {
                ZkError::BadVersion => self.bad_version(path, version),
                other => map_error(path, other),
            })?;
        tracing::debug!(path = %path, recursive, "deleted node");
        Ok(())
    }

    fn exists(&mut self, path: &Path) -> Result<bool, NodeError> {
        self.client
            .exists(&path.to_string(), false)
            .map(|stat| stat.is_some())
            .map_err(|error| map_error(path, error))
    }

    fn children(&mut self, path: &Path) -> Result<Vec<String>, NodeError> {
        self.client
            .get_children(&path.to_string(), false)
            .map_err(|error| map_error(path, error))
    }
}

impl Drop for ZooKeeperStore {
    fn drop(&mut self) {
        match self.client.close() {
            Ok(()) => tracing::info!(hosts = %self.hosts, "closed zookeeper session"),
            Err(error) => {
                tracing::warn!(hosts = %self.hosts, %error, "failed to close zookeeper session")
            }
        }
    }
}
