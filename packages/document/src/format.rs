//! Document text formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DocumentError;

/// A text format a document can be read from or written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Format; 2] = [Format::Json, Format::Yaml];

    /// Get the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// File extensions conventionally used for the format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }

    /// Guess the format of a file from its extension.
    ///
    /// ```rust
    /// use treeconf_document::Format;
    /// use std::path::Path;
    ///
    /// assert_eq!(Format::from_path(Path::new("seed.yml")), Some(Format::Yaml));
    /// assert_eq!(Format::from_path(Path::new("seed.txt")), None);
    /// ```
    pub fn from_path(path: &std::path::Path) -> Option<Format> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// Check if this is JSON format.
    pub fn is_json(&self) -> bool {
        matches!(self, Format::Json)
    }

    /// Check if this is YAML format.
    pub fn is_yaml(&self) -> bool {
        matches!(self, Format::Yaml)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Format {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&lowered.as_str()))
            .ok_or_else(|| DocumentError::UnsupportedFormat(s.to_string()))
    }
}

impl AsRef<str> for Format {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
