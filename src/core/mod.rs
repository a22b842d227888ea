//! Core types shared by the client, the resources and the store

pub mod call;
pub mod error;
pub mod page;
pub mod query;

pub use call::{Call, CallResult};
pub use error::{ConfigError, DescriptorError, ErrorDetails, RequestError, ResourceError};
pub use page::{Direction, Order, Page, PageRequest};
pub use query::{QueryBag, QueryParams};
