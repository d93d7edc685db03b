use treeconf_document::{
    Codec, DocumentError, DocumentMap, DocumentValue, Format, MultiCodec, SerializeOptions,
};
use treeconf_node_store::{
    Bytes, CreateOptions, NodeError, NodeStat, NodeStore, Path, Version, Watch,
};
use treeconf_tree::{ImportOptions, TreeExporter, TreeImporter};

use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::registry::connect_store;

/// A node store bound to the document importer, exporter and codecs.
///
/// Node operations pass straight through to the store and return its errors
/// unchanged. The document operations seed a namespace from a document or
/// file and snapshot one back out.
///
/// # Example
///
/// ```rust
/// use treeconf::{path, ConfigEndpoint, DocumentMap, DocumentValue, EndpointConfig, ImportOptions};
///
/// let mut endpoint = ConfigEndpoint::connect(&EndpointConfig::for_backend("memory")).unwrap();
/// let mut document = DocumentMap::new();
/// document.insert("app".to_string(), DocumentValue::from("demo"));
/// endpoint
///     .import_document(&document, &ImportOptions::default())
///     .unwrap();
///
/// let (value, _) = endpoint.get(&path!("/app"), None).unwrap();
/// assert_eq!(&value[..], b"demo");
/// ```
pub struct ConfigEndpoint {
    store: Box<dyn NodeStore>,
    codec: MultiCodec,
}

impl ConfigEndpoint {
    /// Wrap an already-open store.
    pub fn new(store: impl NodeStore + 'static) -> Self {
        Self::from_boxed(Box::new(store))
    }

    pub fn from_boxed(store: Box<dyn NodeStore>) -> Self {
        ConfigEndpoint {
            store,
            codec: MultiCodec::with_defaults(),
        }
    }

    /// Open the backend named in `config` and bind it.
    pub fn connect(config: &EndpointConfig) -> Result<Self> {
        let store = connect_store(config)?;
        tracing::info!(backend = %config.backend, "opened endpoint");
        Ok(Self::from_boxed(store))
    }

    /// The underlying store.
    pub fn store(&mut self) -> &mut dyn NodeStore {
        &mut *self.store
    }

    pub fn create(
        &mut self,
        path: &Path,
        value: &[u8],
        options: &CreateOptions,
    ) -> std::result::Result<Path, NodeError> {
        self.store.create(path, value, options)
    }

    pub fn get(
        &mut self,
        path: &Path,
        watch: Option<Watch>,
    ) -> std::result::Result<(Bytes, NodeStat), NodeError> {
        self.store.get(path, watch)
    }

    pub fn update(
        &mut self,
        path: &Path,
        value: &[u8],
        version: Version,
    ) -> std::result::Result<NodeStat, NodeError> {
        self.store.update(path, value, version)
    }

    pub fn delete(
        &mut self,
        path: &Path,
        version: Version,
        recursive: bool,
    ) -> std::result::Result<(), NodeError> {
        self.store.delete(path, version, recursive)
    }

    pub fn exists(&mut self, path: &Path) -> std::result::Result<bool, NodeError> {
        self.store.exists(path)
    }

    pub fn children(&mut self, path: &Path) -> std::result::Result<Vec<String>, NodeError> {
        self.store.children(path)
    }

    /// Upsert every entry of `document` into the tree.
    ///
    /// # Returns
    ///
    /// The number of nodes written.
    pub fn import_document(
        &mut self,
        document: &DocumentMap,
        options: &ImportOptions,
    ) -> std::result::Result<usize, NodeError> {
        TreeImporter::new(&mut *self.store, options).import(document)
    }

    /// Snapshot the subtree at `root` as `{name: subtree}`.
    ///
    /// `None` when `root` itself cannot be read.
    pub fn export_document(&mut self, root: &Path) -> Option<DocumentValue> {
        TreeExporter::new(&mut *self.store).export(root)
    }

    /// Read a JSON or YAML file and import it.
    ///
    /// Without `format` it is inferred from the file extension. The file's
    /// top level must be a map.
    pub fn import_from_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
        format: Option<Format>,
        options: &ImportOptions,
    ) -> Result<usize> {
        let path = path.as_ref();
        let format = resolve_format(path, format)?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        let document = self.codec.decode(&text, format)?.into_root()?;

        let written = self.import_document(&document, options)?;
        tracing::info!(file = %path.display(), %format, written, "imported file");
        Ok(written)
    }

    /// Export the subtree at `root` into a file.
    ///
    /// # Returns
    ///
    /// `false`, with nothing written, when `root` cannot be read.
    pub fn export_to_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
        format: Option<Format>,
        root: &Path,
        options: &SerializeOptions,
    ) -> Result<bool> {
        let path = path.as_ref();
        let format = resolve_format(path, format)?;
        let Some(document) = self.export_document(root) else {
            tracing::warn!(
                root = %root,
                file = %path.display(),
                "root unreadable, nothing exported"
            );
            return Ok(false);
        };

        let mut text = self.codec.encode(&document, format, options)?;
        text.push('\n');
        std::fs::write(path, text).map_err(|source| Error::io(path, source))?;
        tracing::info!(root = %root, file = %path.display(), %format, "exported file");
        Ok(true)
    }
}

fn resolve_format(path: &std::path::Path, format: Option<Format>) -> Result<Format> {
    match format.or_else(|| Format::from_path(path)) {
        Some(format) => Ok(format),
        None => Err(DocumentError::UnsupportedFormat(path.display().to_string()).into()),
    }
}
