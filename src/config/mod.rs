//! Configuration loading and management

use crate::client::http::BackendHttp;
use crate::client::interceptor::{AUTHENTICATION_PATH, InterceptingHttp};
use crate::core::error::ConfigError;
use crate::resource::ResourceBuilder;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named resource endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Name used to look the resource up (e.g., "users")
    pub name: String,

    /// Base URL every method path is appended to
    pub base_url: String,

    /// Headers sent with every request of this resource
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,
}

/// Complete client configuration
///
/// ```yaml
/// auth_path: /api/authentication
/// resources:
///   - name: users
///     base_url: http://localhost:8080/api/users
///     default_headers:
///       Accept-Language: en
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Path suffix of the endpoint whose 401s must reach the caller
    #[serde(default = "default_auth_path")]
    pub auth_path: String,

    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

fn default_auth_path() -> String {
    AUTHENTICATION_PATH.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_path: default_auth_path(),
            resources: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        let config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Combine several configurations
    ///
    /// Resources are merged by name, a later entry replacing an earlier one
    /// in place. The last configuration decides the auth path.
    pub fn merge(configs: Vec<ClientConfig>) -> Self {
        let mut auth_path = default_auth_path();
        let mut resources: IndexMap<String, ResourceConfig> = IndexMap::new();

        for config in configs {
            auth_path = config.auth_path;
            for resource in config.resources {
                resources.insert(resource.name.clone(), resource);
            }
        }

        Self {
            auth_path,
            resources: resources.into_values().collect(),
        }
    }

    /// Find a resource entry by name
    pub fn find(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    /// A builder preloaded with the entry's base URL and default headers
    pub fn resource(&self, name: &str) -> Result<ResourceBuilder, ConfigError> {
        let entry = self.find(name).ok_or_else(|| ConfigError::UnknownResource {
            name: name.to_string(),
        })?;
        Ok(ResourceBuilder::new(&entry.base_url).default_headers(
            entry
                .default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    /// The `reqwest` stack behind a 401 interceptor using this auth path
    pub fn http(&self) -> InterceptingHttp {
        InterceptingHttp::new(BackendHttp::reqwest()).with_auth_path(&self.auth_path)
    }
}
