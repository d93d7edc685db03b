//! Translation between treeconf's node types and the `zookeeper` crate's.

use std::sync::Mutex;

use zookeeper::{
    Acl as ZkAcl, CreateMode, Permission, Stat, WatchedEvent, WatchedEventType, ZkError,
};

use treeconf_node_store::{
    Acl, CreateOptions, NodeError, NodeStat, Path, Perms, Watch, WatchEvent, WatchKind,
};

/// Map a service error for an operation on `path`.
///
/// `BadVersion` carries no versions here; callers that know them build the
/// error themselves.
pub(crate) fn map_error(path: &Path, error: ZkError) -> NodeError {
    match error {
        ZkError::NoNode => NodeError::NoSuchNode { path: path.clone() },
        ZkError::NodeExists => NodeError::NodeExists { path: path.clone() },
        ZkError::NotEmpty => NodeError::NotEmpty { path: path.clone() },
        ZkError::NoAuth => NodeError::AccessDenied { path: path.clone() },
        ZkError::NoChildrenForEphemerals => {
            NodeError::NoChildrenForEphemerals { path: path.clone() }
        }
        ZkError::BadVersion => NodeError::BadVersion {
            path: path.clone(),
            expected: -1,
            actual: -1,
        },
        other => NodeError::transport(other).at(path),
    }
}

pub(crate) fn to_zk_perms(perms: Perms) -> Permission {
    [
        (Perms::READ, Permission::READ),
        (Perms::WRITE, Permission::WRITE),
        (Perms::CREATE, Permission::CREATE),
        (Perms::DELETE, Permission::DELETE),
        (Perms::ADMIN, Permission::ADMIN),
    ]
    .into_iter()
    .filter(|(ours, _)| perms.contains(*ours))
    .fold(Permission::NONE, |acc, (_, theirs)| acc | theirs)
}

/// An empty ACL list falls back to `world:anyone` with every permission.
pub(crate) fn to_zk_acls(acl: &[Acl]) -> Vec<ZkAcl> {
    if acl.is_empty() {
        return to_zk_acls(&[Acl::open_unsafe()]);
    }
    acl.iter()
        .map(|entry| ZkAcl {
            perms: to_zk_perms(entry.perms),
            scheme: entry.scheme.clone(),
            id: entry.id.clone(),
        })
        .collect()
}

pub(crate) fn create_mode(options: &CreateOptions) -> CreateMode {
    match (options.ephemeral, options.sequence) {
        (false, false) => CreateMode::Persistent,
        (true, false) => CreateMode::Ephemeral,
        (false, true) => CreateMode::PersistentSequential,
        (true, true) => CreateMode::EphemeralSequential,
    }
}

pub(crate) fn to_node_stat(stat: &Stat) -> NodeStat {
    NodeStat {
        created_txn: stat.czxid,
        modified_txn: stat.mzxid,
        version: stat.version,
        child_version: stat.cversion,
        data_length: usize::try_from(stat.data_length).unwrap_or(0),
        num_children: usize::try_from(stat.num_children).unwrap_or(0),
        ephemeral: stat.ephemeral_owner != 0,
    }
}

/// Convert a fired watch, falling back to the watched path when the event
/// names none.
pub(crate) fn to_watch_event(watched: &Path, event: &WatchedEvent) -> WatchEvent {
    let kind = match event.event_type {
        WatchedEventType::NodeDataChanged => WatchKind::DataChanged,
        WatchedEventType::NodeDeleted => WatchKind::Deleted,
        _ => WatchKind::Other,
    };
    let path = event
        .path
        .as_deref()
        .and_then(|p| Path::parse(p).ok())
        .unwrap_or_else(|| watched.clone());
    WatchEvent { path, kind }
}

/// Adapt a one-shot watch to the client's `Fn` watcher.
///
/// The callback runs for the first event only; later events are ignored.
pub(crate) fn one_shot_watcher(
    watched: Path,
    watch: Watch,
) -> impl Fn(WatchedEvent) + Send + 'static {
    let slot = Mutex::new(Some(watch));
    move |event: WatchedEvent| {
        let pending = slot.lock().ok().and_then(|mut slot| slot.take());
        if let Some(watch) = pending {
            watch(to_watch_event(&watched, &event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use treeconf_node_store::path;
    use zookeeper::KeeperState;

    #[test]
    fn node_errors_keep_the_path() {
        let p = path!("/a/b");
        assert!(matches!(
            map_error(&p, ZkError::NoNode),
            NodeError::NoSuchNode { path } if path == p
        ));
        assert!(matches!(
            map_error(&p, ZkError::NodeExists),
            NodeError::NodeExists { .. }
        ));
        assert!(matches!(
            map_error(&p, ZkError::NotEmpty),
            NodeError::NotEmpty { .. }
        ));
        assert!(matches!(
            map_error(&p, ZkError::NoAuth),
            NodeError::AccessDenied { .. }
        ));
        assert!(matches!(
            map_error(&p, ZkError::NoChildrenForEphemerals),
            NodeError::NoChildrenForEphemerals { .. }
        ));
        assert!(matches!(
            map_error(&p, ZkError::BadVersion),
            NodeError::BadVersion { .. }
        ));
    }

    #[test]
    fn session_errors_are_transport() {
        let p = path!("/a");
        for error in [
            ZkError::ConnectionLoss,
            ZkError::SessionExpired,
            ZkError::OperationTimeout,
            ZkError::AuthFailed,
        ] {
            let mapped = map_error(&p, error);
            assert!(matches!(mapped, NodeError::Transport { .. }));
            assert_eq!(mapped.path(), Some(&p));
        }
    }

    #[test]
    fn perms_translate_bit_for_bit() {
        assert!(to_zk_perms(Perms::ALL) == Permission::ALL);
        assert!(to_zk_perms(Perms::NONE) == Permission::NONE);
        assert!(
            to_zk_perms(Perms::READ | Perms::CREATE) == Permission::READ | Permission::CREATE
        );
    }

    #[test]
    fn digest_acl_is_passed_through() {
        let acls = to_zk_acls(&[Acl::digest("user", "password", Perms::READ)]);
        assert_eq!(acls.len(), 1);
        assert_eq!(acls[0].scheme, "digest");
        assert_eq!(acls[0].id, "user:tpUq/4Pn5A64fVZyQ0gOJ8ZWqkY=");
        assert!(acls[0].perms == Permission::READ);
    }

    #[test]
    fn empty_acl_is_open() {
        let acls = to_zk_acls(&[]);
        assert_eq!(acls.len(), 1);
        assert_eq!(acls[0].scheme, "world");
        assert_eq!(acls[0].id, "anyone");
        assert!(acls[0].perms == Permission::ALL);
    }

    #[test]
    fn create_modes() {
        let base = CreateOptions::default();
        assert!(matches!(create_mode(&base), CreateMode::Persistent));
        assert!(matches!(
            create_mode(&base.clone().ephemeral(true)),
            CreateMode::Ephemeral
        ));
        assert!(matches!(
            create_mode(&base.clone().sequence(true)),
            CreateMode::PersistentSequential
        ));
        assert!(matches!(
            create_mode(&base.ephemeral(true).sequence(true)),
            CreateMode::EphemeralSequential
        ));
    }

    #[test]
    fn watch_events_translate() {
        let event = WatchedEvent {
            event_type: WatchedEventType::NodeDeleted,
            keeper_state: KeeperState::SyncConnected,
            path: Some("/a/b".to_string()),
        };
        let converted = to_watch_event(&path!("/x"), &event);
        assert_eq!(converted.path, path!("/a/b"));
        assert_eq!(converted.kind, WatchKind::Deleted);

        let event = WatchedEvent {
            event_type: WatchedEventType::NodeChildrenChanged,
            keeper_state: KeeperState::SyncConnected,
            path: None,
        };
        let converted = to_watch_event(&path!("/x"), &event);
        assert_eq!(converted.path, path!("/x"));
        assert_eq!(converted.kind, WatchKind::Other);
    }

    #[test]
    fn watcher_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let watch: Watch = {
            let fired = Arc::clone(&fired);
            let seen = Arc::clone(&seen);
            Box::new(move |event: WatchEvent| {
                fired.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(event);
            })
        };
        let watcher = one_shot_watcher(path!("/a"), watch);

        let changed = || WatchedEvent {
            event_type: WatchedEventType::NodeDataChanged,
            keeper_state: KeeperState::SyncConnected,
            path: Some("/a".to_string()),
        };
        watcher(changed());
        watcher(changed());

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![WatchEvent {
                path: path!("/a"),
                kind: WatchKind::DataChanged,
            }]
        );
    }
}
