use std::path::PathBuf;

use treeconf_document::DocumentError;
use treeconf_node_store::NodeError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unsupported backend: {tag}")]
    UnsupportedBackend { tag: String },

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
