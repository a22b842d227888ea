//! Transport backends
//!
//! A backend performs exactly one HTTP exchange. It reports any non-success
//! status as [`ResourceError::Status`] so that interceptors can decide what
//! to do with it.

use super::request::{HttpRequest, HttpResponse};
use crate::core::error::ResourceError;
use async_trait::async_trait;

/// Trait for HTTP transports
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Send the request and read the whole response
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError>;
}

/// Backend built on a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, TLS)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError> {
        let url = request.full_url()?;
        let target = url.to_string();

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ResourceError::Transport {
                url: target.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ResourceError::Transport {
                url: target,
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(ResourceError::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            url,
            headers,
            body,
        })
    }
}
