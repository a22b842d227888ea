//! Query bags and query-string accumulation
//!
//! A query-bound call argument is not a single key/value: it is a bag of
//! parameters that gets expanded into the request's query string.
//!
//! # Expansion rules
//!
//! - `null` values are skipped
//! - arrays append one entry per element (`?tags=1&tags=2&tags=3`)
//! - objects are JSON-stringified and set
//! - scalars are set; a later bag overrides an earlier one for the same key
//!
//! # Example
//! ```rust,ignore
//! let mut params = QueryParams::new();
//! params.extend_from_bag(&QueryBag::new().with("tags", json!([1, 2, 3])));
//! assert_eq!(params.get_all("tags"), ["1", "2", "3"]);
//! ```

use crate::core::error::ResourceError;
use indexmap::IndexMap;
use reqwest::Url;
use serde::Serialize;
use serde_json::{Map, Value};

/// A dictionary of query-string parameters passed as one argument
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBag(Map<String, Value>);

impl QueryBag {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a bag from any value that serializes to a JSON object
    ///
    /// `null` (e.g. a `None`) yields an empty bag.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ResourceError> {
        Self::try_from(serde_json::to_value(value)?)
    }

    /// Add one entry, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for QueryBag {
    type Error = ResourceError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(ResourceError::decode(format!(
                "a query bag must be an object, got {}",
                other
            ))),
        }
    }
}

impl From<Map<String, Value>> for QueryBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Render a JSON value the way it appears in a query string or URL path
///
/// Strings are used verbatim, everything else as its JSON text.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accumulated query parameters for one request
///
/// Keys keep their first insertion position; `set` replaces the values of a
/// key, `append` adds one more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `key` with `value`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// Add a value to `key`, keeping the existing ones
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// All values recorded for `key`, in order
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in query-string order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Expand a query bag into these parameters
    pub fn extend_from_bag(&mut self, bag: &QueryBag) {
        for (key, value) in bag.entries() {
            match value {
                Value::Null => continue,
                Value::Array(items) => {
                    for item in items {
                        self.append(key.as_str(), stringify(item));
                    }
                }
                // objects and scalars alike: set, no append for non arrays
                other => self.set(key.as_str(), stringify(other)),
            }
        }
    }

    /// Append the parameters to `url`'s query string, form-encoded
    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.pairs());
    }
}
