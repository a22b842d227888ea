//! HTTP plumbing under the resources
//!
//! ```text
//! Resource ──▶ InterceptingHttp ──▶ BackendHttp ──▶ HttpBackend (reqwest)
//!                 (401 policy)        (lazy call)     (one exchange)
//! ```

pub mod backend;
pub mod http;
pub mod interceptor;
pub mod request;

pub use backend::{HttpBackend, ReqwestBackend};
pub use http::{BackendHttp, Http};
pub use interceptor::{AUTHENTICATION_PATH, InterceptingHttp};
pub use request::{HttpMethod, HttpRequest, HttpResponse};

/// The default stack: `reqwest` transport behind the 401 interceptor
pub fn intercepting_reqwest() -> InterceptingHttp {
    InterceptingHttp::new(BackendHttp::reqwest())
}
