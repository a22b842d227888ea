//! Declarative REST resources
//!
//! A [`Resource<T>`] pairs an immutable [`ResourceDescriptor`] with an
//! [`Http`] service. Invoking a method turns the positional arguments into a
//! request according to the method's bindings:
//!
//! 1. `Path` arguments replace the first `{key}` in the path template
//! 2. the URL is the `Url` argument (or the base URL) followed by the path
//! 3. `Query` arguments are expanded into the query string
//! 4. the `Body` argument is sent verbatim (text) or serialized (JSON)
//! 5. headers: resource defaults, then method headers, then `Header` arguments
//!
//! The request goes through [`ResourceHooks::intercept_request`], is sent,
//! decoded as JSON when possible and finally passed through
//! [`ResourceHooks::intercept_response`]. Nothing is sent until the returned
//! [`Call`] is awaited.

pub mod args;
pub mod descriptor;
pub mod factory;

pub use args::Arg;
pub use descriptor::{
    MediaType, MethodDescriptor, ParamBinding, ResourceBuilder, ResourceDescriptor, builtin,
};
pub use factory::ResourceFactory;

use crate::client::http::Http;
use crate::client::request::{HttpRequest, HttpResponse};
use crate::core::call::Call;
use crate::core::error::{RequestError, ResourceError};
use crate::core::page::{Page, PageRequest};
use crate::core::query::{QueryBag, QueryParams};
use args::ABSENT;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Page size used by [`Resource::find_all`]
///
/// Collections larger than this are silently truncated to the first page.
pub const FIND_ALL_PAGE_SIZE: u32 = 5000;

/// Decoded response of a resource call
#[derive(Debug, Clone)]
pub enum Payload {
    /// The body parsed as JSON
    Json(Value),

    /// The response as received: the method produces raw content, or the
    /// body was not valid JSON
    Raw(HttpResponse),
}

impl Payload {
    fn from_response(response: HttpResponse) -> Self {
        match response.json() {
            Ok(value) => Payload::Json(value),
            Err(e) => {
                tracing::debug!(
                    url = %response.url,
                    error = %e,
                    "response body is not JSON, keeping it raw"
                );
                Payload::Raw(response)
            }
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Raw(_) => None,
        }
    }

    /// Deserialize a JSON payload into `U`
    pub fn decode<U: DeserializeOwned>(self) -> Result<U, ResourceError> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Raw(response) => Err(ResourceError::decode(format!(
                "expected a JSON body from {}, got {} bytes of raw content",
                response.url,
                response.body.len()
            ))),
        }
    }
}

/// Override points around every call of a resource
pub trait ResourceHooks: Send + Sync {
    /// Adjust the request before it is sent
    fn intercept_request(&self, _request: &mut HttpRequest) {}

    /// Transform the decoded response
    fn intercept_response(&self, call: Call<Payload>) -> Call<Payload> {
        call
    }
}

/// Hooks that change nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ResourceHooks for NoHooks {}

/// Typed client for one REST base path
///
/// `T` is the entity type the built-in methods exchange.
pub struct Resource<T> {
    descriptor: Arc<ResourceDescriptor>,
    http: Arc<dyn Http>,
    hooks: Arc<dyn ResourceHooks>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            http: self.http.clone(),
            hooks: self.hooks.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> Resource<T> {
    pub fn new(descriptor: impl Into<Arc<ResourceDescriptor>>, http: Arc<dyn Http>) -> Self {
        Self {
            descriptor: descriptor.into(),
            http,
            hooks: Arc::new(NoHooks),
            _entity: PhantomData,
        }
    }

    pub fn with_hooks(mut self, hooks: impl ResourceHooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Build the request a call of `name` with `args` would send
    ///
    /// Missing trailing arguments count as [`Arg::Absent`].
    pub fn build_request(&self, name: &str, args: &[Arg]) -> Result<HttpRequest, ResourceError> {
        let method = self
            .descriptor
            .method(name)
            .ok_or_else(|| RequestError::UnknownMethod {
                method: name.to_string(),
            })?;
        let params = method.params();
        if args.len() > params.len() {
            return Err(RequestError::ArgumentCount {
                method: name.to_string(),
                expected: params.len(),
                actual: args.len(),
            }
            .into());
        }
        let arg_at = |position: usize| args.get(position).unwrap_or(&ABSENT);

        // Path substitution comes first
        let mut path = method.path_template().to_string();
        for (position, binding) in params.iter().enumerate() {
            if let ParamBinding::Path(key) = binding
                && let Some(value) = arg_at(position).as_text()
            {
                path = path.replacen(&format!("{{{}}}", key), &value, 1);
            }
        }

        let url_override = params
            .iter()
            .position(|b| matches!(b, ParamBinding::Url))
            .and_then(|position| arg_at(position).as_text());
        let url = match url_override {
            Some(base) => base + &path,
            None => format!("{}{}", self.descriptor.base_url(), path),
        };

        let mut query = QueryParams::new();
        for (position, binding) in params.iter().enumerate() {
            if !matches!(binding, ParamBinding::Query) {
                continue;
            }
            let bag = arg_at(position)
                .to_query_bag()
                .map_err(|message| RequestError::InvalidArgument {
                    method: name.to_string(),
                    position,
                    message,
                })?;
            if let Some(bag) = bag {
                query.extend_from_bag(&bag);
            }
        }

        let body = params
            .iter()
            .position(|b| matches!(b, ParamBinding::Body))
            .and_then(|position| arg_at(position).to_body());

        let mut headers = HeaderMap::new();
        for (header, value) in self.descriptor.default_headers() {
            insert_header(&mut headers, header, value)?;
        }
        for (header, value) in method.headers() {
            insert_header(&mut headers, header, value)?;
        }
        for (position, binding) in params.iter().enumerate() {
            if let ParamBinding::Header(header) = binding
                && let Some(value) = arg_at(position).as_text()
            {
                insert_header(&mut headers, header, &value)?;
            }
        }
        if headers.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(HttpRequest {
            method: method.http_method(),
            url,
            headers,
            body,
            query,
        })
    }

    /// Call a declared method
    pub fn invoke(&self, name: &str, args: Vec<Arg>) -> Call<Payload> {
        let mut request = match self.build_request(name, &args) {
            Ok(request) => request,
            Err(e) => return Call::fail(e),
        };
        // build_request has already resolved the method
        let media_type = self
            .descriptor
            .method(name)
            .map(MethodDescriptor::media_type)
            .unwrap_or_default();

        self.hooks.intercept_request(&mut request);
        tracing::debug!(
            resource_method = name,
            method = %request.method,
            url = %request.url,
            "invoking resource method"
        );

        let call = self.http.request(request);
        let call = match media_type {
            MediaType::Json => call.map(Payload::from_response),
            MediaType::Raw => call.map(Payload::Raw),
        };
        self.hooks.intercept_response(call)
    }

    /// Call a declared method and deserialize its JSON result
    pub fn invoke_as<U>(&self, name: &str, args: Vec<Arg>) -> Call<U>
    where
        U: DeserializeOwned + Send + 'static,
    {
        self.invoke(name, args).and_then(Payload::decode)
    }

    /// `DELETE {base}/{id}`
    ///
    /// Untyped: delete endpoints commonly answer without a body.
    pub fn delete(&self, id: impl Into<Arg>) -> Call<Payload> {
        self.invoke(builtin::DELETE, vec![id.into()])
    }
}

impl<T> Resource<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// `GET {base}/{id}`
    pub fn find_one(&self, id: impl Into<Arg>) -> Call<T> {
        self.invoke_as(builtin::FIND_ONE, vec![id.into()])
    }

    /// `POST {base}` with the entity as body
    pub fn save(&self, entity: &T) -> Call<T> {
        match Arg::json(entity) {
            Ok(body) => self.invoke_as(builtin::SAVE, vec![body]),
            Err(e) => Call::fail(e),
        }
    }

    /// `PUT {base}/{id}` with the entity as body
    pub fn update(&self, id: impl Into<Arg>, entity: &T) -> Call<T> {
        match Arg::json(entity) {
            Ok(body) => self.invoke_as(builtin::UPDATE, vec![id.into(), body]),
            Err(e) => Call::fail(e),
        }
    }

    /// `GET {base}?page=..&size=..&sort=..&<search params>`
    pub fn find(&self, page: Option<&PageRequest>, search: Option<QueryBag>) -> Call<Page<T>> {
        let page = match page.map(Arg::try_from).transpose() {
            Ok(page) => page.unwrap_or_default(),
            Err(e) => return Call::fail(e),
        };
        self.invoke_as(builtin::FIND, vec![page, Arg::from(search)])
    }

    /// Every entity, fetched as one page of [`FIND_ALL_PAGE_SIZE`]
    ///
    /// Anything beyond the first [`FIND_ALL_PAGE_SIZE`] records is not returned.
    pub fn find_all(&self) -> Call<Vec<T>> {
        let page = PageRequest::new(0, FIND_ALL_PAGE_SIZE);
        self.find(Some(&page), None).map(|page| page.content)
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ResourceError> {
    let invalid = |message: String| RequestError::InvalidHeader {
        name: name.to_string(),
        message,
    };
    let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    headers.insert(header, value);
    Ok(())
}
