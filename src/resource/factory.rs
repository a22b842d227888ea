//! Explicit construction of resources
//!
//! The factory owns the shared HTTP stack and a registry of named
//! descriptors, and hands out [`Resource`]s bound to both. It is built once
//! at startup and passed to whoever needs resources.

use super::{Resource, ResourceBuilder, ResourceDescriptor};
use crate::client::http::Http;
use crate::config::ClientConfig;
use crate::core::error::{ConfigError, ResourceError};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named resource descriptors sharing one HTTP stack
///
/// # Example
///
/// ```rust,ignore
/// let factory = ResourceFactory::new(client::intercepting_reqwest())
///     .register("users", ResourceBuilder::new("http://localhost:8080/api/users").build()?);
///
/// let users: Resource<User> = factory.resource("users")?;
/// ```
#[derive(Clone)]
pub struct ResourceFactory {
    http: Arc<dyn Http>,
    descriptors: HashMap<String, Arc<ResourceDescriptor>>,
}

impl ResourceFactory {
    pub fn new(http: impl Http + 'static) -> Self {
        Self {
            http: Arc::new(http),
            descriptors: HashMap::new(),
        }
    }

    /// Factory with the configured HTTP stack and one descriptor per
    /// configured resource (built-in methods only)
    pub fn from_config(config: &ClientConfig) -> Result<Self, ResourceError> {
        let mut factory = Self::new(config.http());
        for entry in &config.resources {
            let descriptor = config.resource(&entry.name)?.build()?;
            factory = factory.register(entry.name.clone(), descriptor);
        }
        Ok(factory)
    }

    /// Register a descriptor under `name`, replacing any previous one
    pub fn register(mut self, name: impl Into<String>, descriptor: ResourceDescriptor) -> Self {
        self.descriptors.insert(name.into(), Arc::new(descriptor));
        self
    }

    /// Build and register in one step
    pub fn declare(
        self,
        name: impl Into<String>,
        builder: ResourceBuilder,
    ) -> Result<Self, ResourceError> {
        let descriptor = builder.build()?;
        Ok(self.register(name, descriptor))
    }

    /// The shared HTTP stack
    pub fn http(&self) -> Arc<dyn Http> {
        self.http.clone()
    }

    /// Resource bound to the descriptor registered as `name`
    pub fn resource<T>(&self, name: &str) -> Result<Resource<T>, ResourceError> {
        let descriptor = self
            .descriptors
            .get(name)
            .ok_or_else(|| ConfigError::UnknownResource {
                name: name.to_string(),
            })?;
        Ok(Resource::new(descriptor.clone(), self.http()))
    }

    /// Resource for an unregistered descriptor
    pub fn create<T>(&self, descriptor: impl Into<Arc<ResourceDescriptor>>) -> Resource<T> {
        Resource::new(descriptor, self.http())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
