//! The verb-level HTTP service resources talk to

use super::backend::{HttpBackend, ReqwestBackend};
use super::request::{HttpMethod, HttpRequest, HttpResponse};
use crate::core::call::Call;
use std::sync::Arc;

/// HTTP service returning lazy calls
///
/// Every verb funnels through [`Http::request`], so a wrapper only needs to
/// implement that one method to apply its policy to all of them.
pub trait Http: Send + Sync {
    fn request(&self, request: HttpRequest) -> Call<HttpResponse>;

    fn get(&self, url: &str) -> Call<HttpResponse> {
        self.request(HttpRequest::new(HttpMethod::Get, url))
    }

    fn post(&self, url: &str, body: String) -> Call<HttpResponse> {
        self.request(HttpRequest::new(HttpMethod::Post, url).with_body(body))
    }

    fn put(&self, url: &str, body: String) -> Call<HttpResponse> {
        self.request(HttpRequest::new(HttpMethod::Put, url).with_body(body))
    }

    fn delete(&self, url: &str) -> Call<HttpResponse> {
        self.request(HttpRequest::new(HttpMethod::Delete, url))
    }
}

impl<H: Http + ?Sized> Http for Arc<H> {
    fn request(&self, request: HttpRequest) -> Call<HttpResponse> {
        (**self).request(request)
    }
}

/// `Http` over a transport backend, with no policy of its own
#[derive(Clone)]
pub struct BackendHttp {
    backend: Arc<dyn HttpBackend>,
}

impl BackendHttp {
    pub fn new(backend: impl HttpBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Plain `reqwest` transport
    pub fn reqwest() -> Self {
        Self::new(ReqwestBackend::new())
    }
}

impl Http for BackendHttp {
    fn request(&self, request: HttpRequest) -> Call<HttpResponse> {
        let backend = self.backend.clone();
        Call::new(async move {
            tracing::debug!(method = %request.method, url = %request.url, "sending request");
            backend.send(request).await.map(Some)
        })
    }
}
