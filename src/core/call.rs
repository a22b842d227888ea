//! Lazily evaluated, single-value asynchronous results
//!
//! A [`Call`] describes work that produces at most one value. Nothing runs
//! until the call is awaited (or its stream polled), so a call can be built,
//! transformed and handed around before anything reaches the network.
//!
//! A call completes in one of three ways:
//!
//! - `Ok(Some(value))`: one value was produced
//! - `Ok(None)`: the call completed without a value
//! - `Err(error)`: the call failed
//!
//! # Example
//!
//! ```rust,ignore
//! let names = users.find_all().map(|users| {
//!     users.into_iter().map(|u| u.name).collect::<Vec<_>>()
//! });
//! // no request sent yet
//! let names = names.await?;
//! ```

use crate::core::error::ResourceError;
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::future::{Future, IntoFuture};

/// Outcome of a [`Call`]
pub type CallResult<T> = Result<Option<T>, ResourceError>;

/// A cold, zero-or-one value async computation
#[must_use = "a call does nothing until it is awaited or streamed"]
pub struct Call<T> {
    inner: BoxFuture<'static, CallResult<T>>,
}

impl<T: Send + 'static> Call<T> {
    /// Wrap a future; it is not polled until the call is consumed
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = CallResult<T>> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// A call that yields `value`
    pub fn value(value: T) -> Self {
        Self::new(future::ready(Ok(Some(value))))
    }

    /// A call that completes without a value
    pub fn empty() -> Self {
        Self::new(future::ready(Ok(None)))
    }

    /// A call that fails with `error`
    pub fn fail(error: ResourceError) -> Self {
        Self::new(future::ready(Err(error)))
    }

    /// Transform the value, if one is produced
    pub fn map<U, F>(self, f: F) -> Call<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let inner = self.inner;
        Call::new(async move { Ok(inner.await?.map(f)) })
    }

    /// Transform the value with a fallible function
    pub fn and_then<U, F>(self, f: F) -> Call<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U, ResourceError> + Send + 'static,
    {
        let inner = self.inner;
        Call::new(async move {
            match inner.await? {
                Some(value) => f(value).map(Some),
                None => Ok(None),
            }
        })
    }

    /// Handle a failure: recover with a value, complete empty, or re-raise
    pub fn catch<F>(self, f: F) -> Call<T>
    where
        F: FnOnce(ResourceError) -> CallResult<T> + Send + 'static,
    {
        let inner = self.inner;
        Call::new(async move {
            match inner.await {
                Ok(value) => Ok(value),
                Err(error) => f(error),
            }
        })
    }

    /// View the call as a stream of zero or one item
    pub fn into_stream(self) -> BoxStream<'static, Result<T, ResourceError>> {
        stream::once(self.inner)
            .filter_map(|outcome| future::ready(outcome.transpose()))
            .boxed()
    }
}

impl<T> IntoFuture for Call<T> {
    type Output = CallResult<T>;
    type IntoFuture = BoxFuture<'static, CallResult<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.inner
    }
}

impl<T> fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").finish_non_exhaustive()
    }
}
