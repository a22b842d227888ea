//! Login and logout against the authentication endpoint
//!
//! [`AuthSession`] is the effect side of the auth store: it performs the
//! HTTP exchange and dispatches the outcome, so the reducer stays pure.

use crate::client::http::Http;
use crate::core::error::{DescriptorError, ResourceError};
use crate::resource::{
    Arg, MethodDescriptor, ParamBinding, Payload, Resource, ResourceBuilder, ResourceDescriptor,
};
use crate::store::{AppState, AuthAction, AuthState, Store};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const LOGIN: &str = "login";
pub const LOGOUT: &str = "logout";

/// Authentication flow bound to one endpoint and one store
#[derive(Clone)]
pub struct AuthSession {
    resource: Resource<Value>,
    store: Store<AppState>,
}

impl AuthSession {
    /// `POST {endpoint}` to log in, `DELETE {endpoint}` to log out
    pub fn descriptor(endpoint: impl Into<String>) -> Result<ResourceDescriptor, DescriptorError> {
        ResourceBuilder::new(endpoint)
            .method(MethodDescriptor::post(LOGIN).param(ParamBinding::Body))
            .method(MethodDescriptor::delete(LOGOUT))
            .build()
    }

    /// `endpoint` is the full URL of the authentication resource
    pub fn new(
        endpoint: impl Into<String>,
        http: Arc<dyn Http>,
        store: Store<AppState>,
    ) -> Result<Self, ResourceError> {
        let descriptor = Self::descriptor(endpoint)?;
        Ok(Self {
            resource: Resource::new(descriptor, http),
            store,
        })
    }

    /// Post the credentials
    ///
    /// On success the response body becomes the stored user. A failed
    /// exchange is recorded in the store and returned.
    pub async fn login<C>(&self, credentials: &C) -> Result<Option<Value>, ResourceError>
    where
        C: Serialize + ?Sized,
    {
        let body = Arg::json(credentials)?;
        match self.resource.invoke(LOGIN, vec![body]).await {
            Ok(Some(payload)) => {
                let user = match payload {
                    Payload::Json(user) => user,
                    Payload::Raw(_) => Value::Null,
                };
                self.store
                    .dispatch(AuthAction::LoginSuccess(user.clone()).into());
                Ok(Some(user))
            }
            Ok(None) => {
                tracing::debug!("login completed without a response");
                Ok(None)
            }
            Err(e) => {
                let details = serde_json::to_value(e.to_details()).unwrap_or_default();
                self.store.dispatch(AuthAction::LoginFailed(details).into());
                Err(e)
            }
        }
    }

    /// Delete the server-side session, then clear the local one
    pub async fn logout(&self) -> Result<(), ResourceError> {
        self.resource.invoke(LOGOUT, Vec::new()).await?;
        self.store.dispatch(AuthAction::LogoutSuccess.into());
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.state().auth.authenticated
    }

    pub fn state(&self) -> AuthState {
        self.store.state().auth
    }

    pub fn store(&self) -> &Store<AppState> {
        &self.store
    }
}
