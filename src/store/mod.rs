//! Single-writer state container
//!
//! The [`Store`] holds the application state behind a `tokio::sync::watch`
//! channel. State only changes through [`Store::dispatch`], which folds an
//! [`Action`] into the current state with a pure reducer; any number of
//! readers observe it through snapshots or [`Store::select`] streams.
//!
//! ```text
//! dispatch(action) ──▶ reducer(&state, &action) ──▶ watch channel ──▶ select(..) streams
//!                                                                 ──▶ state() snapshots
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = AppState::store();
//! let mut auth = store.select(select_auth);
//!
//! store.dispatch(AuthAction::LoginSuccess(json!({"login": "ada"})).into());
//! while let Some(state) = auth.next().await {
//!     println!("authenticated: {}", state.authenticated);
//! }
//! ```

pub mod auth;

pub use auth::{AppState, AuthAction, AuthState, app_reducer, auth_reducer, select_auth};

use futures::future;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A string-tagged action
///
/// The `type` identifiers are stable: they are what gets logged and what
/// reducers match on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Pure state transition
pub type Reducer<S> = fn(&S, &Action) -> S;

/// Process-wide state container
///
/// Cheap to clone; clones share the same state.
pub struct Store<S> {
    sender: Arc<watch::Sender<S>>,
    reducer: Reducer<S>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            reducer: self.reducer,
        }
    }
}

impl<S> Store<S>
where
    S: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: S, reducer: Reducer<S>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            reducer,
        }
    }

    /// Fold `action` into the state
    ///
    /// Subscribers are only notified when the state actually changes.
    pub fn dispatch(&self, action: Action) {
        let reducer = self.reducer;
        let changed = self.sender.send_if_modified(|state| {
            let next = reducer(state, &action);
            if next == *state {
                return false;
            }
            *state = next;
            true
        });
        tracing::debug!(action = %action.kind, changed, "dispatched action");
    }

    /// Snapshot of the current state
    pub fn state(&self) -> S {
        self.sender.borrow().clone()
    }

    /// Raw watch receiver, for callers that want `changed().await`
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.sender.subscribe()
    }

    /// Stream of a projection of the state
    ///
    /// Yields the current projection first, then every distinct new value.
    pub fn select<T, F>(&self, selector: F) -> impl Stream<Item = T> + Send + use<S, T, F>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&S) -> T + Send + 'static,
    {
        let mut last: Option<T> = None;
        WatchStream::new(self.sender.subscribe()).filter_map(move |state| {
            let value = selector(&state);
            let emit = if last.as_ref() == Some(&value) {
                None
            } else {
                last = Some(value.clone());
                Some(value)
            };
            future::ready(emit)
        })
    }
}
