//! Typed error handling for resource clients
//!
//! Every failure a resource call can produce is a [`ResourceError`]. Callers
//! can match on specific categories instead of inspecting strings:
//!
//! - [`ResourceError::Status`]: the server answered with a non-success status
//! - [`ResourceError::Transport`]: the request never produced a response
//! - [`RequestError`]: the request could not be built from the call arguments
//! - [`ResourceError::Decode`]: a typed value was required but the payload did not fit
//! - [`DescriptorError`]: a resource declaration is inconsistent
//! - [`ConfigError`]: configuration could not be loaded
//!
//! # Example
//!
//! ```rust,ignore
//! match users.find_one(5).await {
//!     Ok(Some(user)) => println!("Found: {:?}", user),
//!     Ok(None) => println!("Session expired, nothing to show"),
//!     Err(ResourceError::Status { status: 404, .. }) => println!("No such user"),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The root error type of the crate
#[derive(Debug)]
pub enum ResourceError {
    /// The server answered with a non-success status
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The transport failed before a response was received
    Transport { url: String, message: String },

    /// The request could not be built
    Request(RequestError),

    /// A response payload did not match the expected type
    Decode { message: String },

    /// A resource declaration is inconsistent
    Descriptor(DescriptorError),

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Status { status, url, .. } => {
                write!(f, "HTTP {} returned by {}", status, url)
            }
            ResourceError::Transport { url, message } => {
                write!(f, "Request to {} failed: {}", url, message)
            }
            ResourceError::Request(e) => write!(f, "{}", e),
            ResourceError::Decode { message } => {
                write!(f, "Failed to decode response: {}", message)
            }
            ResourceError::Descriptor(e) => write!(f, "{}", e),
            ResourceError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Request(e) => Some(e),
            ResourceError::Descriptor(e) => Some(e),
            ResourceError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Serializable summary of an error
///
/// This is what gets folded into the auth store when a login fails.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// HTTP status, when the server answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ResourceError {
    /// Build a decode error from anything printable
    pub fn decode(message: impl fmt::Display) -> Self {
        ResourceError::Decode {
            message: message.to_string(),
        }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ResourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// URL of the failed request, if known
    pub fn url(&self) -> Option<&str> {
        match self {
            ResourceError::Status { url, .. } | ResourceError::Transport { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Whether the server rejected the request as unauthenticated (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ResourceError::Status { .. } => "HTTP_STATUS",
            ResourceError::Transport { .. } => "TRANSPORT_ERROR",
            ResourceError::Request(e) => e.error_code(),
            ResourceError::Decode { .. } => "DECODE_ERROR",
            ResourceError::Descriptor(_) => "DESCRIPTOR_ERROR",
            ResourceError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to a serializable summary
    pub fn to_details(&self) -> ErrorDetails {
        ErrorDetails {
            code: self.error_code().to_string(),
            message: self.to_string(),
            status: self.status(),
        }
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        ResourceError::decode(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised while turning call arguments into an HTTP request
#[derive(Debug)]
pub enum RequestError {
    /// The computed URL is not a valid absolute URL
    InvalidUrl { url: String, message: String },

    /// A header name or value is not valid HTTP
    InvalidHeader { name: String, message: String },

    /// An argument does not fit its binding
    InvalidArgument {
        method: String,
        position: usize,
        message: String,
    },

    /// More arguments than declared parameters
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// No method with that name is declared on the resource
    UnknownMethod { method: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidUrl { url, message } => {
                write!(f, "Invalid URL '{}': {}", url, message)
            }
            RequestError::InvalidHeader { name, message } => {
                write!(f, "Invalid header '{}': {}", name, message)
            }
            RequestError::InvalidArgument {
                method,
                position,
                message,
            } => {
                write!(
                    f,
                    "Invalid argument {} for '{}': {}",
                    position, method, message
                )
            }
            RequestError::ArgumentCount {
                method,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "'{}' takes at most {} arguments, got {}",
                    method, expected, actual
                )
            }
            RequestError::UnknownMethod { method } => {
                write!(f, "Unknown resource method: {}", method)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidUrl { .. } => "INVALID_URL",
            RequestError::InvalidHeader { .. } => "INVALID_HEADER",
            RequestError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            RequestError::ArgumentCount { .. } => "ARGUMENT_COUNT",
            RequestError::UnknownMethod { .. } => "UNKNOWN_METHOD",
        }
    }
}

impl From<RequestError> for ResourceError {
    fn from(err: RequestError) -> Self {
        ResourceError::Request(err)
    }
}

// =============================================================================
// Descriptor Errors
// =============================================================================

/// Inconsistent resource declarations, reported by `ResourceBuilder::build`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("method '{method}' declares more than one body parameter")]
    MultipleBodies { method: String },

    #[error("method '{method}' declares more than one url parameter")]
    MultipleUrls { method: String },

    #[error("method '{method}' is declared twice")]
    DuplicateMethod { method: String },

    #[error("method '{method}' binds path key '{key}' more than once")]
    DuplicatePathKey { method: String, key: String },
}

impl From<DescriptorError> for ResourceError {
    fn from(err: DescriptorError) -> Self {
        ResourceError::Descriptor(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// No resource with that name is configured
    UnknownResource { name: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::UnknownResource { name } => {
                write!(f, "No resource named '{}' is configured", name)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ResourceError {
    fn from(err: ConfigError) -> Self {
        ResourceError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessors() {
        let err = ResourceError::Status {
            status: 401,
            url: "http://localhost/api/users/5".to_string(),
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.url(), Some("http://localhost/api/users/5"));
        assert_eq!(err.error_code(), "HTTP_STATUS");
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = ResourceError::Transport {
            url: "http://localhost".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), None);
        assert_eq!(err.url(), Some("http://localhost"));
    }

    #[test]
    fn test_request_error_codes() {
        let err: ResourceError = RequestError::UnknownMethod {
            method: "search".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "UNKNOWN_METHOD");
        assert_eq!(err.to_string(), "Unknown resource method: search");
    }

    #[test]
    fn test_descriptor_error_display() {
        let err = DescriptorError::MultipleBodies {
            method: "save".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "method 'save' declares more than one body parameter"
        );
        let err: ResourceError = err.into();
        assert_eq!(err.error_code(), "DESCRIPTOR_ERROR");
    }

    #[test]
    fn test_details_serialization() {
        let err = ResourceError::Status {
            status: 401,
            url: "http://localhost/api/authentication".to_string(),
            body: "bad credentials".to_string(),
        };
        let details = serde_json::to_value(err.to_details()).unwrap();
        assert_eq!(details["code"], "HTTP_STATUS");
        assert_eq!(details["status"], 401);

        let details = serde_json::to_value(ResourceError::decode("eof").to_details()).unwrap();
        assert!(details.get("status").is_none());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            file: Some("client.yaml".to_string()),
            message: "invalid syntax".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'client.yaml': invalid syntax"
        );
    }
}
