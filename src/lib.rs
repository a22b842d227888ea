//! # rest-resource
//!
//! Declarative REST resources over a lazy HTTP client, plus a small
//! reducer-driven store for authentication state.
//!
//! ## Features
//!
//! - **Declarative resources**: describe methods once (verb, path template,
//!   parameter bindings) and call them by name
//! - **Built-in CRUD**: `find_one`, `save`, `update`, `delete`, paginated
//!   `find` and `find_all` on every resource
//! - **Lazy calls**: nothing goes over the wire until a [`Call`](core::Call)
//!   is awaited or streamed
//! - **401 interception**: expired sessions complete quietly instead of
//!   failing every request, except on the authentication endpoint
//! - **Auth store**: pure reducer over login and logout actions, observable
//!   through selector streams
//! - **Configuration-Based**: resource endpoints and default headers from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rest_resource::prelude::*;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let http: Arc<dyn Http> = Arc::new(client::intercepting_reqwest());
//! let users: Resource<User> = Resource::new(
//!     ResourceBuilder::new("http://localhost:8080/api/users").build()?,
//!     http,
//! );
//!
//! let page = users.find(Some(&PageRequest::new(0, 20)), None).await?;
//! let ada = users.find_one(1).await?;
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod resource;
pub mod session;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        call::{Call, CallResult},
        error::{ConfigError, DescriptorError, ErrorDetails, RequestError, ResourceError},
        page::{Direction, Order, Page, PageRequest},
        query::QueryBag,
    };

    // === Macros ===
    pub use crate::args;

    // === Client ===
    pub use crate::client::{
        self, AUTHENTICATION_PATH, BackendHttp, Http, HttpBackend, HttpMethod, HttpRequest,
        HttpResponse, InterceptingHttp, ReqwestBackend,
    };

    // === Resources ===
    pub use crate::resource::{
        Arg, FIND_ALL_PAGE_SIZE, MediaType, MethodDescriptor, NoHooks, ParamBinding, Payload,
        Resource, ResourceBuilder, ResourceDescriptor, ResourceFactory, ResourceHooks, builtin,
    };

    // === Store ===
    pub use crate::store::{
        Action, AppState, AuthAction, AuthState, Reducer, Store, app_reducer, auth_reducer,
        select_auth,
    };

    // === Session ===
    pub use crate::session::AuthSession;

    // === Config ===
    pub use crate::config::{ClientConfig, ResourceConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
