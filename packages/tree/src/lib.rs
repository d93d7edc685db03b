//! Mapping between node trees and nested documents.
//!
//! A map entry `{key: value}` at path `P` is the node `P/key`. Scalars are
//! node values, maps are children, and a list is a sequence of contents
//! written to the same node in turn. A node that holds a value *and* has
//! children exports as `[value, {children...}]`, which imports back to the
//! same node.
//!
//! - `TreeImporter`: Upsert a document into a `NodeStore`, failing fast
//! - `TreeExporter`: Read a subtree into a document, skipping unreadable
//!   branches
//!
//! # Example
//!
//! ```rust
//! use treeconf_document::{Codec, Format, JsonCodec};
//! use treeconf_node_store::{path, InMemoryNodeStore};
//! use treeconf_tree::{ImportOptions, TreeExporter, TreeImporter};
//!
//! let doc = JsonCodec
//!     .decode(r#"{"a": ["hello", {"b": "x"}]}"#, Format::Json)
//!     .unwrap();
//!
//! let mut store = InMemoryNodeStore::new();
//! TreeImporter::new(&mut store, &ImportOptions::default())
//!     .import(&doc.clone().into_root().unwrap())
//!     .unwrap();
//!
//! let exported = TreeExporter::new(&mut store).export(&path!("/a")).unwrap();
//! assert_eq!(exported, doc);
//! ```

mod export;
mod import;

pub use export::TreeExporter;
pub use import::{ImportOptions, TreeImporter};
