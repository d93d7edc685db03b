//! treeconf documents: the nested side of the tree mapping.
//!
//! - `DocumentValue`: Scalars, lists and maps (the shape of a config file)
//! - `Format`: Which text format a document is read from or written to
//! - `Codec`: Parse and serialize documents (`JsonCodec`, `YamlCodec`)
//!
//! # Example
//!
//! ```rust
//! use treeconf_document::{Codec, DocumentValue, Format, MultiCodec, SerializeOptions};
//!
//! let codec = MultiCodec::default();
//! let doc = codec.decode("app:\n  port: 8080\n", Format::Yaml).unwrap();
//! assert_eq!(
//!     doc.get("app").and_then(|app| app.get("port")),
//!     Some(&DocumentValue::from("8080"))
//! );
//!
//! let json = codec.encode(&doc, Format::Json, &SerializeOptions::default()).unwrap();
//! assert_eq!(json, r#"{"app":{"port":"8080"}}"#);
//! ```

mod codec;
mod convert;
mod error;
mod format;
mod value;

pub use codec::{Codec, JsonCodec, MultiCodec, SerializeOptions, YamlCodec};
pub use convert::{document_to_json, document_to_yaml, json_to_document, yaml_to_document};
pub use error::DocumentError;
pub use format::Format;
pub use value::{DocumentMap, DocumentValue};
