//! Call descriptors and the builder that assembles them
//!
//! A resource is declared once: a base URL, default headers and a table of
//! methods, each with a verb, a path template and ordered parameter
//! bindings. [`ResourceBuilder::build`] validates the declaration and
//! produces an immutable [`ResourceDescriptor`] that every invocation reads.
//!
//! # Example
//!
//! ```rust,ignore
//! let descriptor = ResourceBuilder::new("http://localhost:8080/api/users")
//!     .default_header("X-Client", "console")
//!     .method(
//!         MethodDescriptor::get("by_role")
//!             .path("/roles/{role}")
//!             .param(ParamBinding::path("role"))
//!             .param(ParamBinding::Query),
//!     )
//!     .build()?;
//! ```

use crate::client::request::HttpMethod;
use crate::core::error::DescriptorError;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static PATH_TOKEN: OnceLock<Regex> = OnceLock::new();

/// Names of the methods every resource provides
pub mod builtin {
    pub const FIND_ONE: &str = "find_one";
    pub const SAVE: &str = "save";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const FIND: &str = "find";
}

/// What a positional argument is used for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamBinding {
    /// Replaces the resource base URL
    Url,

    /// Substituted for `{key}` in the path template
    Path(String),

    /// A bag of query parameters
    Query,

    /// The request body (at most one per method)
    Body,

    /// Value of the named header
    Header(String),
}

impl ParamBinding {
    pub fn path(key: impl Into<String>) -> Self {
        ParamBinding::Path(key.into())
    }

    pub fn header(name: impl Into<String>) -> Self {
        ParamBinding::Header(name.into())
    }
}

/// How a response body is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    /// Parsed as JSON when possible, raw otherwise
    #[default]
    Json,

    /// Never parsed
    Raw,
}

/// Declaration of one resource method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    name: String,
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    media_type: MediaType,
    params: Vec<ParamBinding>,
}

impl MethodDescriptor {
    pub fn new(method: HttpMethod, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: String::new(),
            headers: Vec::new(),
            media_type: MediaType::Json,
            params: Vec::new(),
        }
    }

    pub fn get(name: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, name)
    }

    pub fn post(name: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, name)
    }

    pub fn put(name: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, name)
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, name)
    }

    /// Path template appended to the base URL, e.g. `/{id}/roles`
    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = template.into();
        self
    }

    /// Static header sent with every call of this method
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn produces(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Bind the next positional argument
    pub fn param(mut self, binding: ParamBinding) -> Self {
        self.params.push(binding);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn http_method(&self) -> HttpMethod {
        self.method
    }

    pub fn path_template(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn params(&self) -> &[ParamBinding] {
        &self.params
    }

    /// Keys of all `{token}`s in the path template
    pub fn path_tokens(&self) -> Vec<&str> {
        path_tokens(&self.path)
    }

    fn validate(&self) -> Result<(), DescriptorError> {
        let count = |wanted: fn(&ParamBinding) -> bool| {
            self.params.iter().filter(|b| wanted(b)).count()
        };

        if count(|b| matches!(b, ParamBinding::Body)) > 1 {
            return Err(DescriptorError::MultipleBodies {
                method: self.name.clone(),
            });
        }
        if count(|b| matches!(b, ParamBinding::Url)) > 1 {
            return Err(DescriptorError::MultipleUrls {
                method: self.name.clone(),
            });
        }

        let mut keys = HashSet::new();
        for binding in &self.params {
            if let ParamBinding::Path(key) = binding
                && !keys.insert(key.as_str())
            {
                return Err(DescriptorError::DuplicatePathKey {
                    method: self.name.clone(),
                    key: key.clone(),
                });
            }
        }

        for token in self.path_tokens() {
            if !keys.contains(token) {
                tracing::debug!(
                    method = %self.name,
                    token,
                    "path token has no binding and will stay in the URL"
                );
            }
        }

        Ok(())
    }
}

/// Keys of all `{token}`s in `template`, in order
pub(crate) fn path_tokens(template: &str) -> Vec<&str> {
    let regex = PATH_TOKEN.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").unwrap());
    regex
        .captures_iter(template)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// The methods every resource starts with
fn builtin_methods() -> Vec<MethodDescriptor> {
    vec![
        MethodDescriptor::get(builtin::FIND_ONE)
            .path("/{id}")
            .param(ParamBinding::path("id")),
        MethodDescriptor::post(builtin::SAVE).param(ParamBinding::Body),
        MethodDescriptor::put(builtin::UPDATE)
            .path("/{id}")
            .param(ParamBinding::path("id"))
            .param(ParamBinding::Body),
        MethodDescriptor::delete(builtin::DELETE)
            .path("/{id}")
            .param(ParamBinding::path("id")),
        MethodDescriptor::get(builtin::FIND)
            .param(ParamBinding::Query)
            .param(ParamBinding::Query),
    ]
}

/// Immutable method table of one resource
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    base_url: String,
    default_headers: Vec<(String, String)>,
    methods: HashMap<String, MethodDescriptor>,
}

impl ResourceDescriptor {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    /// All declared method names, sorted
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for [`ResourceDescriptor`]
///
/// Declared methods may replace a built-in of the same name; declaring the
/// same custom name twice is an error.
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    base_url: String,
    default_headers: Vec<(String, String)>,
    methods: Vec<MethodDescriptor>,
}

impl ResourceBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Header sent with every method unless overridden
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn default_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.default_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> Result<ResourceDescriptor, DescriptorError> {
        let mut methods: HashMap<String, MethodDescriptor> = builtin_methods()
            .into_iter()
            .map(|m| (m.name.clone(), m))
            .collect();

        let mut declared = HashSet::new();
        for method in self.methods {
            if !declared.insert(method.name.clone()) {
                return Err(DescriptorError::DuplicateMethod {
                    method: method.name,
                });
            }
            method.validate()?;
            methods.insert(method.name.clone(), method);
        }

        Ok(ResourceDescriptor {
            base_url: self.base_url,
            default_headers: self.default_headers,
            methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_always_present() {
        let descriptor = ResourceBuilder::new("http://localhost/api/users")
            .build()
            .unwrap();
        assert_eq!(
            descriptor.method_names(),
            vec!["delete", "find", "find_one", "save", "update"]
        );

        let find_one = descriptor.method(builtin::FIND_ONE).unwrap();
        assert_eq!(find_one.http_method(), HttpMethod::Get);
        assert_eq!(find_one.path_template(), "/{id}");

        let update = descriptor.method(builtin::UPDATE).unwrap();
        assert_eq!(
            update.params(),
            &[ParamBinding::path("id"), ParamBinding::Body]
        );
    }

    #[test]
    fn test_custom_method_is_registered() {
        let descriptor = ResourceBuilder::new("http://localhost/api/users")
            .default_header("X-Client", "tests")
            .method(
                MethodDescriptor::get("by_role")
                    .path("/roles/{role}")
                    .header("Accept", "application/json")
                    .param(ParamBinding::path("role"))
                    .param(ParamBinding::Query),
            )
            .build()
            .unwrap();

        let method = descriptor.method("by_role").unwrap();
        assert_eq!(method.path_tokens(), vec!["role"]);
        assert_eq!(method.headers().len(), 1);
        assert_eq!(descriptor.default_headers()[0].0, "X-Client");
    }

    #[test]
    fn test_multiple_bodies_are_rejected() {
        let err = ResourceBuilder::new("http://localhost")
            .method(
                MethodDescriptor::post("merge")
                    .param(ParamBinding::Body)
                    .param(ParamBinding::Body),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::MultipleBodies {
                method: "merge".to_string()
            }
        );
    }

    #[test]
    fn test_multiple_urls_are_rejected() {
        let err = ResourceBuilder::new("http://localhost")
            .method(
                MethodDescriptor::get("mirror")
                    .param(ParamBinding::Url)
                    .param(ParamBinding::Url),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, DescriptorError::MultipleUrls { .. }));
    }

    #[test]
    fn test_duplicate_methods_are_rejected() {
        let err = ResourceBuilder::new("http://localhost")
            .method(MethodDescriptor::get("ping"))
            .method(MethodDescriptor::post("ping"))
            .build()
            .unwrap_err();
        assert!(matches!(err, DescriptorError::DuplicateMethod { .. }));
    }

    #[test]
    fn test_duplicate_path_keys_are_rejected() {
        let err = ResourceBuilder::new("http://localhost")
            .method(
                MethodDescriptor::get("pair")
                    .path("/{id}/{id}")
                    .param(ParamBinding::path("id"))
                    .param(ParamBinding::path("id")),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, DescriptorError::DuplicatePathKey { .. }));
    }

    #[test]
    fn test_builtin_can_be_replaced() {
        let descriptor = ResourceBuilder::new("http://localhost")
            .method(
                MethodDescriptor::get(builtin::FIND_ONE)
                    .path("/by-slug/{slug}")
                    .param(ParamBinding::path("slug")),
            )
            .build()
            .unwrap();
        assert_eq!(
            descriptor.method(builtin::FIND_ONE).unwrap().path_template(),
            "/by-slug/{slug}"
        );
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(path_tokens("/{org}/members/{id}"), vec!["org", "id"]);
        assert!(path_tokens("/plain").is_empty());
    }
}
