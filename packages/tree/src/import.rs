//! Document → node tree.

use treeconf_document::{DocumentMap, DocumentValue};
use treeconf_node_store::{Acl, CreateOptions, NodeError, NodeStore, Path, Version};

/// Options for an import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    /// Node under which the document's top-level keys are created.
    pub root: Path,
    /// ACL for every node the import creates.
    pub acl: Vec<Acl>,
    /// Create nodes tied to the session.
    pub ephemeral: bool,
    /// Create nodes with a sequence suffix.
    pub sequence: bool,
    /// Create missing ancestors of each node.
    pub make_intermediate_paths: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            root: Path::root(),
            acl: Vec::new(),
            ephemeral: false,
            sequence: false,
            make_intermediate_paths: true,
        }
    }
}

impl ImportOptions {
    fn create_options(&self) -> CreateOptions {
        CreateOptions {
            acl: self.acl.clone(),
            ephemeral: self.ephemeral,
            sequence: self.sequence,
            make_intermediate_paths: self.make_intermediate_paths,
        }
    }
}

/// Materializes documents as nodes.
///
/// Every node is upserted: created if absent, otherwise its value is
/// overwritten (any version) and its existing children are left alone.
/// Importing the same document twice therefore leaves the same tree as
/// importing it once.
///
/// The first store error aborts the walk and is returned as is. Nodes written
/// before it stay written.
pub struct TreeImporter<'a, S: NodeStore + ?Sized> {
    store: &'a mut S,
    root: Path,
    create: CreateOptions,
    written: usize,
}

impl<'a, S: NodeStore + ?Sized> TreeImporter<'a, S> {
    pub fn new(store: &'a mut S, options: &ImportOptions) -> Self {
        TreeImporter {
            store,
            root: options.root.clone(),
            create: options.create_options(),
            written: 0,
        }
    }

    /// Import every top-level entry of `document` under the root.
    ///
    /// # Returns
    ///
    /// The number of upserts performed.
    pub fn import(&mut self, document: &DocumentMap) -> Result<usize, NodeError> {
        self.written = 0;
        for (key, value) in document {
            // `/` is how an export of the store's root names it.
            let path = if key == "/" {
                self.root.clone()
            } else {
                self.root.descend(key).map_err(|e| NodeError::from(e).at(&self.root))?
            };
            self.materialize(&path, value)?;
        }
        tracing::info!(root = %self.root, upserts = self.written, "imported document");
        Ok(self.written)
    }

    fn materialize(&mut self, path: &Path, value: &DocumentValue) -> Result<(), NodeError> {
        if value.is_empty() {
            return self.upsert(path, b"");
        }

        match value {
            DocumentValue::Scalar(text) => self.upsert(path, text.as_bytes()),
            // Every element lands on the same node; the last scalar wins.
            DocumentValue::List(items) => {
                for item in items {
                    self.materialize(path, item)?;
                }
                Ok(())
            }
            DocumentValue::Map(children) => {
                for (key, child) in children {
                    let child_path = path.descend(key).map_err(|e| NodeError::from(e).at(path))?;
                    self.materialize(&child_path, child)?;
                }
                Ok(())
            }
        }
    }

    fn upsert(&mut self, path: &Path, value: &[u8]) -> Result<(), NodeError> {
        self.write(path, value).map_err(|e| e.at(path))?;
        self.written += 1;
        Ok(())
    }

    fn write(&mut self, path: &Path, value: &[u8]) -> Result<(), NodeError> {
        if self.store.exists(path)? {
            tracing::debug!(path = %path, "updating node");
            self.store.update(path, value, Version::Any)?;
        } else {
            tracing::debug!(path = %path, "creating node");
            self.store.create(path, value, &self.create)?;
        }
        Ok(())
    }
}
