//! 401 handling shared by every request
//!
//! An expired session makes every in-flight call fail with 401. Outside of
//! the authentication endpoint those failures are turned into an empty
//! completion, so callers simply see no value; the authentication endpoint
//! keeps its 401 so a login form can report bad credentials.

use super::http::Http;
use super::request::{HttpRequest, HttpResponse};
use crate::core::call::Call;
use crate::core::error::ResourceError;
use std::sync::Arc;

/// Path of the authentication endpoint whose 401s are never suppressed
pub const AUTHENTICATION_PATH: &str = "/api/authentication";

/// `Http` wrapper applying the 401 policy to all verbs
#[derive(Clone)]
pub struct InterceptingHttp {
    inner: Arc<dyn Http>,
    auth_path: String,
}

impl InterceptingHttp {
    pub fn new(inner: impl Http + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            auth_path: AUTHENTICATION_PATH.to_string(),
        }
    }

    pub fn with_auth_path(mut self, auth_path: impl Into<String>) -> Self {
        self.auth_path = auth_path.into();
        self
    }

    pub fn auth_path(&self) -> &str {
        &self.auth_path
    }

    /// Apply the policy to a call
    pub fn intercept(&self, call: Call<HttpResponse>) -> Call<HttpResponse> {
        let auth_path = self.auth_path.clone();
        call.catch(move |error| {
            if is_suppressed(&error, &auth_path) {
                tracing::warn!(url = error.url().unwrap_or_default(), "suppressing 401 response");
                Ok(None)
            } else {
                Err(error)
            }
        })
    }
}

impl Http for InterceptingHttp {
    fn request(&self, request: HttpRequest) -> Call<HttpResponse> {
        self.intercept(self.inner.request(request))
    }
}

/// 401 on anything but the authentication endpoint
fn is_suppressed(error: &ResourceError, auth_path: &str) -> bool {
    if !error.is_unauthorized() {
        return false;
    }
    let url = error.url().unwrap_or_default();
    let path = url.split(['?', '#']).next().unwrap_or(url);
    !path.ends_with(auth_path)
}
