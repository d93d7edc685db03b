//! Conversions between DocumentValue and the serde value types.
//!
//! Decoded text may carry nulls, booleans and numbers. A node value is bytes,
//! so they fold into scalars: the falsy ones (null, `false`, zero) become the
//! empty scalar and the rest their textual form.

use crate::{DocumentError, DocumentMap, DocumentValue};

/// Convert serde_json::Value to our DocumentValue.
pub fn json_to_document(json: serde_json::Value) -> DocumentValue {
    match json {
        serde_json::Value::Null => DocumentValue::empty(),
        serde_json::Value::Bool(b) => bool_scalar(b),
        serde_json::Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                DocumentValue::empty()
            } else {
                DocumentValue::Scalar(n.to_string())
            }
        }
        serde_json::Value::String(s) => DocumentValue::Scalar(s),
        serde_json::Value::Array(arr) => {
            DocumentValue::List(arr.into_iter().map(json_to_document).collect())
        }
        serde_json::Value::Object(map) => DocumentValue::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_document(v)))
                .collect(),
        ),
    }
}

/// Convert our DocumentValue to serde_json::Value.
pub fn document_to_json(value: &DocumentValue) -> serde_json::Value {
    match value {
        DocumentValue::Scalar(s) => serde_json::Value::String(s.clone()),
        DocumentValue::List(items) => {
            serde_json::Value::Array(items.iter().map(document_to_json).collect())
        }
        DocumentValue::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), document_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert serde_yaml::Value to our DocumentValue.
///
/// # Errors
///
/// Mapping keys must be scalars other than null; anything else is
/// `InvalidDocument`. Tags are dropped.
pub fn yaml_to_document(yaml: serde_yaml::Value) -> Result<DocumentValue, DocumentError> {
    let value = match yaml {
        serde_yaml::Value::Null => DocumentValue::empty(),
        serde_yaml::Value::Bool(b) => bool_scalar(b),
        serde_yaml::Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                DocumentValue::empty()
            } else {
                DocumentValue::Scalar(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => DocumentValue::Scalar(s),
        serde_yaml::Value::Sequence(seq) => DocumentValue::List(
            seq.into_iter()
                .map(yaml_to_document)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = DocumentMap::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k)?, yaml_to_document(v)?);
            }
            DocumentValue::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_document(tagged.value)?,
    };
    Ok(value)
}

/// Convert our DocumentValue to serde_yaml::Value.
pub fn document_to_yaml(value: &DocumentValue) -> serde_yaml::Value {
    match value {
        DocumentValue::Scalar(s) => serde_yaml::Value::String(s.clone()),
        DocumentValue::List(items) => {
            serde_yaml::Value::Sequence(items.iter().map(document_to_yaml).collect())
        }
        DocumentValue::Map(map) => {
            let mut mapping = serde_yaml::Mapping::with_capacity(map.len());
            for (k, v) in map {
                mapping.insert(serde_yaml::Value::String(k.clone()), document_to_yaml(v));
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

fn bool_scalar(b: bool) -> DocumentValue {
    if b {
        DocumentValue::from("true")
    } else {
        DocumentValue::empty()
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, DocumentError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(DocumentError::invalid(format!(
            "mapping keys must be strings, numbers or booleans, found {:?}",
            other
        ))),
    }
}
