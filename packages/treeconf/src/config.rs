//! Endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use treeconf_document::{DocumentError, Format};

use crate::error::{Error, Result};
use crate::registry::ZOOKEEPER;

/// Credentials added to the session when it is opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub scheme: String,
    /// For `digest`, the plain `user:password` pair.
    pub credential: String,
}

/// Which backend to open and how to reach it.
///
/// Every field has a default, so an empty file is a valid configuration for
/// a local ZooKeeper.
///
/// ```yaml
/// backend: zookeeper
/// hosts: zk1:2181,zk2:2181
/// timeout_secs: 5
/// auth:
///   - scheme: digest
///     credential: user:password
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub backend: String,
    pub hosts: String,
    pub timeout_secs: u64,
    pub auth: Vec<AuthConfig>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            backend: ZOOKEEPER.to_string(),
            hosts: "127.0.0.1:2181".to_string(),
            timeout_secs: 10,
            auth: Vec::new(),
        }
    }
}

impl EndpointConfig {
    /// Defaults with another backend tag.
    pub fn for_backend(tag: impl Into<String>) -> Self {
        EndpointConfig {
            backend: tag.into(),
            ..EndpointConfig::default()
        }
    }

    /// Read a configuration file; the format comes from its extension.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        let config = Self::parse(&text, format).map_err(|error| Error::Config {
            message: format!("{}: {}", path.display(), error),
        })?;
        tracing::debug!(
            path = %path.display(),
            backend = %config.backend,
            "loaded endpoint config"
        );
        Ok(config)
    }

    /// Parse a configuration from text.
    pub fn parse(text: &str, format: Format) -> Result<Self> {
        let parsed = match format {
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            // An empty YAML file is null, not an empty mapping.
            Format::Yaml if text.trim().is_empty() => Ok(EndpointConfig::default()),
            Format::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::Config { message })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `auth` in the form the session expects.
    pub fn auth_pairs(&self) -> Vec<(String, Vec<u8>)> {
        self.auth
            .iter()
            .map(|auth| (auth.scheme.clone(), auth.credential.as_bytes().to_vec()))
            .collect()
    }
}
