//! Authentication state and its reducer

use super::{Action, Store};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LOGIN_SUCCESS: &str = "[AUTH] Login success";
pub const LOGIN_FAILED: &str = "[AUTH] Login failed";
pub const LOGOUT_SUCCESS: &str = "[AUTH] Logout success";

/// The actions the auth reducer understands
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Carries the authenticated user
    LoginSuccess(Value),

    /// Carries the error reported by the login attempt
    LoginFailed(Value),

    LogoutSuccess,
}

impl AuthAction {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthAction::LoginSuccess(_) => LOGIN_SUCCESS,
            AuthAction::LoginFailed(_) => LOGIN_FAILED,
            AuthAction::LogoutSuccess => LOGOUT_SUCCESS,
        }
    }

    /// Recognise an auth action; `None` for any other type
    pub fn parse(action: &Action) -> Option<Self> {
        match action.kind() {
            LOGIN_SUCCESS => Some(AuthAction::LoginSuccess(action.payload.clone())),
            LOGIN_FAILED => Some(AuthAction::LoginFailed(action.payload.clone())),
            LOGOUT_SUCCESS => Some(AuthAction::LogoutSuccess),
            _ => None,
        }
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        let kind = action.kind();
        let payload = match action {
            AuthAction::LoginSuccess(payload) | AuthAction::LoginFailed(payload) => payload,
            AuthAction::LogoutSuccess => Value::Null,
        };
        Action::new(kind, payload)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub authenticated: bool,
    pub user: Option<Value>,
    pub error: Option<Value>,
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

/// Every transition replaces the whole state; unknown actions keep it
pub fn auth_reducer(state: &AuthState, action: &Action) -> AuthState {
    match AuthAction::parse(action) {
        Some(AuthAction::LoginSuccess(user)) => AuthState {
            authenticated: true,
            user: non_null(user),
            error: None,
        },
        Some(AuthAction::LoginFailed(error)) => AuthState {
            authenticated: false,
            user: None,
            error: non_null(error),
        },
        Some(AuthAction::LogoutSuccess) => AuthState::default(),
        None => state.clone(),
    }
}

/// Root state of the application store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub auth: AuthState,
}

impl AppState {
    /// A store starting from the initial state
    pub fn store() -> Store<AppState> {
        Store::new(AppState::default(), app_reducer)
    }
}

pub fn app_reducer(state: &AppState, action: &Action) -> AppState {
    AppState {
        auth: auth_reducer(&state.auth, action),
    }
}

/// Selector for the auth slice
pub fn select_auth(state: &AppState) -> AuthState {
    state.auth.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn logged_in() -> AuthState {
        auth_reducer(
            &AuthState::default(),
            &AuthAction::LoginSuccess(json!({"login": "ada"})).into(),
        )
    }

    #[test]
    fn test_initial_state() {
        let state = AuthState::default();
        assert!(!state.authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_login_success() {
        let state = logged_in();
        assert!(state.authenticated);
        assert_eq!(state.user, Some(json!({"login": "ada"})));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_login_failed_clears_user() {
        let state = auth_reducer(
            &logged_in(),
            &AuthAction::LoginFailed(json!({"code": "HTTP_STATUS"})).into(),
        );
        assert!(!state.authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.error, Some(json!({"code": "HTTP_STATUS"})));
    }

    #[test]
    fn test_login_success_clears_previous_error() {
        let failed = auth_reducer(
            &AuthState::default(),
            &AuthAction::LoginFailed(json!("bad credentials")).into(),
        );
        let state = auth_reducer(&failed, &AuthAction::LoginSuccess(json!("ada")).into());
        assert!(state.authenticated);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let logout: Action = AuthAction::LogoutSuccess.into();
        let once = auth_reducer(&logged_in(), &logout);
        let twice = auth_reducer(&once, &logout);
        assert_eq!(once, AuthState::default());
        assert_eq!(twice, AuthState::default());
    }

    #[test]
    fn test_unknown_action_keeps_state() {
        let state = logged_in();
        let next = auth_reducer(&state, &Action::new("[USER] Loaded", json!({"id": 1})));
        assert_eq!(next, state);
    }

    #[test]
    fn test_action_identifiers() {
        let action: Action = AuthAction::LoginFailed(json!("nope")).into();
        assert_eq!(action.kind(), "[AUTH] Login failed");
        assert_eq!(action.payload, json!("nope"));
        assert_eq!(AuthAction::parse(&action), Some(AuthAction::LoginFailed(json!("nope"))));

        let action: Action = AuthAction::LogoutSuccess.into();
        assert_eq!(action.kind(), "[AUTH] Logout success");
        assert_eq!(action.payload, Value::Null);
    }

    #[test]
    fn test_app_store_folds_auth() {
        let store = AppState::store();
        store.dispatch(AuthAction::LoginSuccess(json!({"login": "ada"})).into());
        assert!(select_auth(&store.state()).authenticated);

        store.dispatch(AuthAction::LogoutSuccess.into());
        store.dispatch(AuthAction::LogoutSuccess.into());
        assert_eq!(store.state(), AppState::default());
    }
}
