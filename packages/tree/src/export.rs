//! Node tree → document.

use treeconf_document::{DocumentMap, DocumentValue};
use treeconf_node_store::{NodeStore, Path};

/// Reads a subtree into a document.
///
/// The walk is best effort: a node that cannot be read (missing, access
/// denied, transport failure) is left out together with its descendants, and
/// its siblings are still exported.
///
/// Children appear in the order the store lists them. Ask the serializer to
/// sort keys when the output has to be stable.
pub struct TreeExporter<'a, S: NodeStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: NodeStore + ?Sized> TreeExporter<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        TreeExporter { store }
    }

    /// Export the subtree at `root` as `{name: subtree}`.
    ///
    /// `name` is the last segment of `root`, or `/` for the root itself.
    /// Returns `None` when `root` itself cannot be read.
    pub fn export(&mut self, root: &Path) -> Option<DocumentValue> {
        let subtree = self.export_node(root)?;
        let name = root.name().unwrap_or("/");

        let mut document = DocumentMap::with_capacity(1);
        document.insert(name.to_string(), subtree);
        tracing::info!(root = %root, "exported subtree");
        Some(DocumentValue::Map(document))
    }

    /// Export the subtree at `path` without the naming wrapper.
    pub fn export_node(&mut self, path: &Path) -> Option<DocumentValue> {
        tracing::debug!(path = %path, "exporting node");
        let value = match self.store.get(path, None) {
            Ok((value, _stat)) => value,
            Err(error) => {
                tracing::debug!(path = %path, %error, "skipping unreadable node");
                return None;
            }
        };
        let children = match self.store.children(path) {
            Ok(children) => children,
            Err(error) => {
                tracing::debug!(path = %path, %error, "skipping node with unlistable children");
                return None;
            }
        };

        let text = match String::from_utf8(value.to_vec()) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!(path = %path, "node value is not UTF-8, exporting lossily");
                String::from_utf8_lossy(&value).into_owned()
            }
        };

        if children.is_empty() {
            return Some(DocumentValue::Scalar(text));
        }

        let mut exported = DocumentMap::with_capacity(children.len());
        for child in children {
            let child_path = match path.child(&child) {
                Ok(child_path) => child_path,
                Err(error) => {
                    tracing::warn!(
                        path = %path,
                        child = %child,
                        %error,
                        "skipping unaddressable child"
                    );
                    continue;
                }
            };
            if let Some(subtree) = self.export_node(&child_path) {
                exported.insert(child, subtree);
            }
        }

        if value.is_empty() {
            Some(DocumentValue::Map(exported))
        } else {
            Some(DocumentValue::List(vec![
                DocumentValue::Scalar(text),
                DocumentValue::Map(exported),
            ]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treeconf_node_store::{path, CreateOptions, InMemoryNodeStore, Version};

    fn store_with(nodes: &[(&str, &str)]) -> InMemoryNodeStore {
        let mut store = InMemoryNodeStore::new();
        for (path, value) in nodes {
            let path = Path::parse(path).unwrap();
            if store.exists(&path).unwrap() {
                store.update(&path, value.as_bytes(), Version::Any).unwrap();
            } else {
                store
                    .create(&path, value.as_bytes(), &CreateOptions::default())
                    .unwrap();
            }
        }
        store
    }

    #[test]
    fn leaf_exports_as_scalar() {
        let mut store = store_with(&[("/a", "1")]);
        let exported = TreeExporter::new(&mut store).export(&path!("/a")).unwrap();
        let expected: DocumentValue = [("a", "1")].into_iter().collect();
        assert_eq!(exported, expected);
    }

    #[test]
    fn children_only_exports_as_map() {
        let mut store = store_with(&[("/a/b", "x"), ("/a/c", "y")]);
        let exported = TreeExporter::new(&mut store)
            .export_node(&path!("/a"))
            .unwrap();
        let expected: DocumentValue = [("b", "x"), ("c", "y")].into_iter().collect();
        assert_eq!(exported, expected);
    }

    #[test]
    fn value_and_children_export_as_pair() {
        let mut store = store_with(&[("/a/b", "x"), ("/a", "hello")]);
        let exported = TreeExporter::new(&mut store)
            .export_node(&path!("/a"))
            .unwrap();
        let children: DocumentValue = [("b", "x")].into_iter().collect();
        assert_eq!(
            exported,
            DocumentValue::List(vec!["hello".into(), children])
        );
    }

    #[test]
    fn root_is_named_slash() {
        let mut store = store_with(&[("/a", "1")]);
        let exported = TreeExporter::new(&mut store).export(&Path::root()).unwrap();
        let inner: DocumentValue = [("a", "1")].into_iter().collect();
        let expected: DocumentValue = [("/", inner)].into_iter().collect();
        assert_eq!(exported, expected);
    }

    #[test]
    fn empty_root_exports_empty_scalar() {
        let mut store = InMemoryNodeStore::new();
        let exported = TreeExporter::new(&mut store).export(&Path::root()).unwrap();
        let expected: DocumentValue = [("/", "")].into_iter().collect();
        assert_eq!(exported, expected);
    }

    #[test]
    fn missing_root_is_none() {
        let mut store = InMemoryNodeStore::new();
        assert!(TreeExporter::new(&mut store)
            .export(&path!("/missing"))
            .is_none());
    }

    #[test]
    fn non_utf8_values_are_lossy() {
        let mut store = InMemoryNodeStore::new();
        store
            .create(&path!("/bin"), &[0x66, 0xff, 0x6f], &CreateOptions::default())
            .unwrap();
        let exported = TreeExporter::new(&mut store)
            .export_node(&path!("/bin"))
            .unwrap();
        assert_eq!(exported, DocumentValue::from("f\u{fffd}o"));
    }
}
