//! The DocumentValue type - the nested side of a node tree.

use indexmap::IndexMap;

use crate::DocumentError;

/// Keyed children of a map value, in insertion order.
pub type DocumentMap = IndexMap<String, DocumentValue>;

/// A nested document value as read from or written to a config file.
///
/// # Design Notes
///
/// - Scalars are always text: a node's value is bytes, so numbers and
///   booleans only survive as their textual form
/// - `Map` preserves insertion order so output follows input, but equality
///   ignores order
/// - A node holding both a value and children is `List([Scalar, Map])`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentValue {
    /// Text value of a leaf node.
    Scalar(String),
    /// Ordered sequence of values.
    List(Vec<DocumentValue>),
    /// Children keyed by segment.
    Map(DocumentMap),
}

impl Default for DocumentValue {
    fn default() -> Self {
        DocumentValue::Scalar(String::new())
    }
}

impl DocumentValue {
    /// Create an empty scalar.
    pub fn empty() -> Self {
        DocumentValue::default()
    }

    /// Create an empty map.
    pub fn map() -> Self {
        DocumentValue::Map(DocumentMap::new())
    }

    /// True for the empty scalar, an empty list and an empty map.
    ///
    /// These all materialize as a node with an empty value and no children.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentValue::Scalar(s) => s.is_empty(),
            DocumentValue::List(items) => items.is_empty(),
            DocumentValue::Map(map) => map.is_empty(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, DocumentValue::Scalar(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, DocumentValue::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, DocumentValue::Map(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            DocumentValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DocumentMap> {
        match self {
            DocumentValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key of a map value.
    ///
    /// Returns `None` for missing keys and for non-map values.
    pub fn get(&self, key: &str) -> Option<&DocumentValue> {
        self.as_map()?.get(key)
    }

    /// Take the top-level map of a document.
    ///
    /// # Errors
    ///
    /// A document whose top level is a scalar or a list cannot be rooted in a
    /// node tree and yields `InvalidDocument`.
    pub fn into_root(self) -> Result<DocumentMap, DocumentError> {
        match self {
            DocumentValue::Map(map) => Ok(map),
            DocumentValue::Scalar(_) => Err(DocumentError::invalid(
                "top level must be a map, found a scalar",
            )),
            DocumentValue::List(_) => Err(DocumentError::invalid(
                "top level must be a map, found a list",
            )),
        }
    }

    /// Sort every map, recursively, by key.
    pub fn sort_keys(&mut self) {
        match self {
            DocumentValue::Scalar(_) => {}
            DocumentValue::List(items) => items.iter_mut().for_each(DocumentValue::sort_keys),
            DocumentValue::Map(map) => {
                map.sort_keys();
                map.values_mut().for_each(DocumentValue::sort_keys);
            }
        }
    }

    /// A copy with every map sorted by key.
    #[must_use]
    pub fn sorted(&self) -> DocumentValue {
        let mut sorted = self.clone();
        sorted.sort_keys();
        sorted
    }
}

// Conversion from common types

impl From<String> for DocumentValue {
    fn from(v: String) -> Self {
        DocumentValue::Scalar(v)
    }
}

impl From<&str> for DocumentValue {
    fn from(v: &str) -> Self {
        DocumentValue::Scalar(v.to_string())
    }
}

impl From<DocumentMap> for DocumentValue {
    fn from(v: DocumentMap) -> Self {
        DocumentValue::Map(v)
    }
}

impl<T: Into<DocumentValue>> From<Vec<T>> for DocumentValue {
    fn from(v: Vec<T>) -> Self {
        DocumentValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<DocumentValue>> FromIterator<(K, V)> for DocumentValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DocumentValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shapes() {
        assert!(DocumentValue::empty().is_empty());
        assert!(DocumentValue::map().is_empty());
        assert!(DocumentValue::List(Vec::new()).is_empty());
        assert!(!DocumentValue::from("x").is_empty());
        assert!(!DocumentValue::from(vec![""]).is_empty());
    }

    #[test]
    fn equality_ignores_key_order() {
        let a: DocumentValue = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: DocumentValue = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn sort_keys_is_recursive() {
        let inner: DocumentValue = [("d", "4"), ("c", "3")].into_iter().collect();
        let mut value: DocumentValue = [
            ("b", DocumentValue::List(vec!["v".into(), inner])),
            ("a", DocumentValue::from("1")),
        ]
        .into_iter()
        .collect();

        value.sort_keys();
        let keys: Vec<&String> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b"]);

        let nested = &value.get("b").unwrap().as_list().unwrap()[1];
        let keys: Vec<&String> = nested.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["c", "d"]);
    }

    #[test]
    fn get_on_non_map_is_none() {
        assert_eq!(DocumentValue::from("x").get("x"), None);
        let value: DocumentValue = [("k", "v")].into_iter().collect();
        assert_eq!(value.get("k"), Some(&DocumentValue::from("v")));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn into_root_requires_map() {
        assert!(DocumentValue::map().into_root().unwrap().is_empty());
        assert!(matches!(
            DocumentValue::from("x").into_root(),
            Err(DocumentError::InvalidDocument { .. })
        ));
        assert!(matches!(
            DocumentValue::from(vec!["x"]).into_root(),
            Err(DocumentError::InvalidDocument { .. })
        ));
    }
}
