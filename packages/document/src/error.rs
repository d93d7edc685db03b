//! Error types for the document layer.

use crate::Format;

/// Errors while reading, writing or interpreting a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The text is not valid in its format.
    #[error("decode error ({format}): {message}")]
    Decode { format: Format, message: String },

    /// The document could not be rendered in the format.
    #[error("encode error ({format}): {message}")]
    Encode { format: Format, message: String },

    /// The text parsed but does not describe a node tree.
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    /// No codec handles the format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl DocumentError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DocumentError::InvalidDocument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let e = DocumentError::Decode {
            format: Format::Json,
            message: "unexpected token".to_string(),
        };
        let display = e.to_string();
        assert!(display.contains("decode error"));
        assert!(display.contains("json"));
        assert!(display.contains("unexpected token"));
    }

    #[test]
    fn invalid_document_display() {
        let e = DocumentError::invalid("top level must be a map");
        assert_eq!(e.to_string(), "invalid document: top level must be a map");
    }

    #[test]
    fn unsupported_format_display() {
        let e = DocumentError::UnsupportedFormat("toml".to_string());
        assert_eq!(e.to_string(), "unsupported format: toml");
    }
}
