//! JSON and YAML codec implementations.

use serde::{Deserialize, Serialize};

use crate::convert::{document_to_json, document_to_yaml, json_to_document, yaml_to_document};
use crate::{DocumentError, DocumentValue, Format};

/// How a document is rendered to text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Pretty-print JSON with this many spaces per level. `Some(0)` only
    /// inserts newlines; `None` is the compact form.
    pub indent: Option<usize>,
    /// Sort every map by key. Use this for stable diffs between snapshots.
    pub sort_keys: bool,
    /// Escape every non-ASCII character in JSON output as `\uXXXX`.
    pub ascii_only: bool,
}

/// Codec for converting between DocumentValue and text.
///
/// # Implementing Custom Codecs
///
/// A codec declares which formats it handles through `supports`, and must
/// reject every other format with `UnsupportedFormat`.
pub trait Codec: Send + Sync {
    /// Parse text into a DocumentValue.
    fn decode(&self, text: &str, format: Format) -> Result<DocumentValue, DocumentError>;

    /// Render a DocumentValue as text.
    fn encode(
        &self,
        value: &DocumentValue,
        format: Format,
        options: &SerializeOptions,
    ) -> Result<String, DocumentError>;

    /// Check if this codec supports a format.
    fn supports(&self, format: Format) -> bool;
}

fn unsupported(format: Format) -> DocumentError {
    DocumentError::UnsupportedFormat(format.to_string())
}

fn prepare(value: &DocumentValue, options: &SerializeOptions) -> DocumentValue {
    if options.sort_keys {
        value.sorted()
    } else {
        value.clone()
    }
}

/// A codec that handles JSON encoding/decoding.
///
/// # Example
///
/// ```rust
/// use treeconf_document::{Codec, DocumentValue, Format, JsonCodec, SerializeOptions};
///
/// let codec = JsonCodec;
/// let value: DocumentValue = [("name", "Alice")].into_iter().collect();
///
/// let text = codec.encode(&value, Format::Json, &SerializeOptions::default()).unwrap();
/// let decoded = codec.decode(&text, Format::Json).unwrap();
///
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, text: &str, format: Format) -> Result<DocumentValue, DocumentError> {
        if !self.supports(format) {
            return Err(unsupported(format));
        }

        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| DocumentError::Decode {
                format,
                message: e.to_string(),
            })?;

        Ok(json_to_document(json))
    }

    fn encode(
        &self,
        value: &DocumentValue,
        format: Format,
        options: &SerializeOptions,
    ) -> Result<String, DocumentError> {
        if !self.supports(format) {
            return Err(unsupported(format));
        }

        let json = document_to_json(&prepare(value, options));
        let encode_error = |e: serde_json::Error| DocumentError::Encode {
            format,
            message: e.to_string(),
        };

        let text = match options.indent {
            None => serde_json::to_string(&json).map_err(encode_error)?,
            Some(width) => {
                let indent = vec![b' '; width];
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                json.serialize(&mut serializer).map_err(encode_error)?;
                String::from_utf8(out).map_err(|e| DocumentError::Encode {
                    format,
                    message: e.to_string(),
                })?
            }
        };

        if options.ascii_only {
            Ok(escape_non_ascii(&text))
        } else {
            Ok(text)
        }
    }

    fn supports(&self, format: Format) -> bool {
        format.is_json()
    }
}

/// Outside string literals JSON text is pure ASCII, so escaping every
/// non-ASCII character of the whole text only touches string contents.
fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// A codec that handles YAML encoding/decoding.
///
/// Output is block style with two-space indentation; `indent` and
/// `ascii_only` have no effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn decode(&self, text: &str, format: Format) -> Result<DocumentValue, DocumentError> {
        if !self.supports(format) {
            return Err(unsupported(format));
        }

        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| DocumentError::Decode {
                format,
                message: e.to_string(),
            })?;

        yaml_to_document(yaml)
    }

    fn encode(
        &self,
        value: &DocumentValue,
        format: Format,
        options: &SerializeOptions,
    ) -> Result<String, DocumentError> {
        if !self.supports(format) {
            return Err(unsupported(format));
        }

        let yaml = document_to_yaml(&prepare(value, options));
        serde_yaml::to_string(&yaml).map_err(|e| DocumentError::Encode {
            format,
            message: e.to_string(),
        })
    }

    fn supports(&self, format: Format) -> bool {
        format.is_yaml()
    }
}

/// A codec that combines multiple codecs.
///
/// Routes encode/decode to the first codec supporting the format.
pub struct MultiCodec {
    codecs: Vec<Box<dyn Codec>>,
}

impl MultiCodec {
    /// Create an empty multi-codec.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Add a codec.
    pub fn add(&mut self, codec: impl Codec + 'static) {
        self.codecs.push(Box::new(codec));
    }

    /// Create a multi-codec with the JSON and YAML codecs included.
    pub fn with_defaults() -> Self {
        let mut mc = Self::new();
        mc.add(JsonCodec);
        mc.add(YamlCodec);
        mc
    }

    fn route(&self, format: Format) -> Result<&dyn Codec, DocumentError> {
        self.codecs
            .iter()
            .find(|codec| codec.supports(format))
            .map(|codec| codec.as_ref())
            .ok_or_else(|| unsupported(format))
    }
}

impl Default for MultiCodec {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Codec for MultiCodec {
    fn decode(&self, text: &str, format: Format) -> Result<DocumentValue, DocumentError> {
        self.route(format)?.decode(text, format)
    }

    fn encode(
        &self,
        value: &DocumentValue,
        format: Format,
        options: &SerializeOptions,
    ) -> Result<String, DocumentError> {
        self.route(format)?.encode(value, format, options)
    }

    fn supports(&self, format: Format) -> bool {
        self.codecs.iter().any(|c| c.supports(format))
    }
}

impl<T: Codec + ?Sized> Codec for Box<T> {
    fn decode(&self, text: &str, format: Format) -> Result<DocumentValue, DocumentError> {
        self.as_ref().decode(text, format)
    }

    fn encode(
        &self,
        value: &DocumentValue,
        format: Format,
        options: &SerializeOptions,
    ) -> Result<String, DocumentError> {
        self.as_ref().encode(value, format, options)
    }

    fn supports(&self, format: Format) -> bool {
        self.as_ref().supports(format)
    }
}
