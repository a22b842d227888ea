//! Positional call arguments
//!
//! A resource method receives its arguments as a list of [`Arg`]s; what each
//! one means is decided by the binding declared at the same position.

use crate::core::error::ResourceError;
use crate::core::page::PageRequest;
use crate::core::query::{QueryBag, stringify};
use serde::Serialize;
use serde_json::Value;

/// One argument of a resource call
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Arg {
    /// Optional argument left out
    #[default]
    Absent,

    /// Text, used verbatim (a body sent as-is, a path segment, a header value)
    Text(String),

    /// Structured value
    Json(Value),
}

pub(crate) static ABSENT: Arg = Arg::Absent;

impl Arg {
    /// Serialize any value into an argument
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ResourceError> {
        Ok(Arg::Json(serde_json::to_value(value)?))
    }

    /// Absent or JSON `null`
    pub fn is_absent(&self) -> bool {
        matches!(self, Arg::Absent | Arg::Json(Value::Null))
    }

    /// Text form for URL, path and header bindings
    pub(crate) fn as_text(&self) -> Option<String> {
        match self {
            Arg::Absent | Arg::Json(Value::Null) => None,
            Arg::Text(text) => Some(text.clone()),
            Arg::Json(value) => Some(stringify(value)),
        }
    }

    /// Request body: textual values verbatim, anything else serialized
    pub(crate) fn to_body(&self) -> Option<String> {
        match self {
            Arg::Absent => None,
            Arg::Text(text) | Arg::Json(Value::String(text)) => Some(text.clone()),
            Arg::Json(value) => Some(value.to_string()),
        }
    }

    /// Query bag, `None` when the argument was left out
    pub(crate) fn to_query_bag(&self) -> Result<Option<QueryBag>, String> {
        match self {
            Arg::Absent | Arg::Json(Value::Null) => Ok(None),
            Arg::Json(value) => QueryBag::try_from(value.clone())
                .map(Some)
                .map_err(|e| e.to_string()),
            Arg::Text(_) => Err("a query bag must be an object, got text".to_string()),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Json(value)
    }
}

impl From<QueryBag> for Arg {
    fn from(bag: QueryBag) -> Self {
        Arg::Json(bag.into_value())
    }
}

impl TryFrom<&PageRequest> for Arg {
    type Error = ResourceError;

    fn try_from(request: &PageRequest) -> Result<Self, Self::Error> {
        request.to_query_bag().map(Arg::from)
    }
}

impl<A: Into<Arg>> From<Option<A>> for Arg {
    fn from(value: Option<A>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Json(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(i32, i64, u32, u64, f64, bool);

/// Build a `Vec<Arg>` from anything convertible into [`Arg`]
///
/// # Example
/// ```rust,ignore
/// users.invoke("search", args!["admins", json!({"active": true})]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::resource::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::resource::Arg::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_forms() {
        assert_eq!(Arg::from(42).as_text().as_deref(), Some("42"));
        assert_eq!(Arg::from("abc").as_text().as_deref(), Some("abc"));
        assert_eq!(Arg::from(json!("abc")).as_text().as_deref(), Some("abc"));
        assert_eq!(Arg::Absent.as_text(), None);
        assert_eq!(Arg::Json(Value::Null).as_text(), None);
    }

    #[test]
    fn test_body_forms() {
        assert_eq!(
            Arg::from("raw=text").to_body().as_deref(),
            Some("raw=text")
        );
        assert_eq!(
            Arg::from(json!({"name": "Ada"})).to_body().as_deref(),
            Some(r#"{"name":"Ada"}"#)
        );
        assert_eq!(Arg::from(json!("hello")).to_body().as_deref(), Some("hello"));
        assert_eq!(
            Arg::json(&"hello".to_string()).unwrap().to_body().as_deref(),
            Some("hello")
        );
        assert_eq!(Arg::from(json!(7)).to_body().as_deref(), Some("7"));
        assert_eq!(Arg::Absent.to_body(), None);
    }

    #[test]
    fn test_query_bag_forms() {
        assert!(Arg::Absent.to_query_bag().unwrap().is_none());
        assert!(Arg::from(json!({"q": "x"})).to_query_bag().unwrap().is_some());
        assert!(Arg::from("q=x").to_query_bag().is_err());
        assert!(Arg::from(json!([1, 2])).to_query_bag().is_err());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Arg::from(None::<&str>), Arg::Absent);
        assert_eq!(Arg::from(Some(5)), Arg::Json(json!(5)));
    }

    #[test]
    fn test_args_macro() {
        let args = crate::args![1, "two", json!({"three": 3})];
        assert_eq!(args.len(), 3);
        assert_eq!(args[1], Arg::Text("two".to_string()));
        assert!(crate::args![].is_empty());
    }
}
