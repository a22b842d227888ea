//! In-process REST backend for integration tests
//!
//! Serves a paginated `users` collection, an authentication endpoint and a
//! few diagnostic routes on an ephemeral port.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod mock_backend;
//! use mock_backend::*;
//! ```
//!
//! | Route                         | Behavior                                        |
//! |-------------------------------|-------------------------------------------------|
//! | `GET /api/users`              | page of users, `page`/`size`/`name` params       |
//! | `POST /api/users`             | create, 201 with the stored user                |
//! | `GET/PUT/DELETE /api/users/{id}` | CRUD, 404 when missing                       |
//! | `GET /api/users/export`       | `text/csv` body                                 |
//! | `GET /api/private/{id}`       | always 401                                      |
//! | `GET /api/echo`               | headers and query pairs as JSON                 |
//! | `POST/DELETE /api/authentication` | login (password `secret`) and logout        |
//! | `POST/DELETE /auth/session`   | same as above under another path               |

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct MockState {
    pub users: Mutex<BTreeMap<u64, Value>>,
    /// Requests received, all routes included
    pub hits: AtomicUsize,
}

impl MockState {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn user(&self, id: u64) -> Option<Value> {
        self.state.users.lock().unwrap().get(&id).cloned()
    }
}

/// Start a backend with users `1..=count` named `user-{id}`
pub async fn start_with_users(count: u64) -> MockServer {
    let state = Arc::new(MockState::default());
    {
        let mut users = state.users.lock().unwrap();
        for id in 1..=count {
            users.insert(id, json!({"id": id, "name": format!("user-{}", id)}));
        }
    }

    let app = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/export", get(export_users))
        .route(
            "/api/users/{id}",
            get(find_user).put(update_user).delete(delete_user),
        )
        .route("/api/private/{id}", get(unauthorized))
        .route("/api/echo", get(echo))
        .route("/api/authentication", post(login).delete(logout))
        .route("/auth/session", post(login).delete(logout))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Small delay to let the server start
    tokio::time::sleep(Duration::from_millis(20)).await;

    MockServer { addr, state }
}

pub async fn start() -> MockServer {
    start_with_users(3).await
}

/// An address nothing listens on
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

async fn list_users(
    State(state): State<Arc<MockState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Value> {
    state.hit();
    let page: usize = param(&params, "page").and_then(|v| v.parse().ok()).unwrap_or(0);
    let size: usize = param(&params, "size")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20)
        .max(1);
    let name = param(&params, "name");

    let users = state.users.lock().unwrap();
    let matching: Vec<&Value> = users
        .values()
        .filter(|user| name.is_none_or(|name| user["name"] == name))
        .collect();
    let total = matching.len();
    let content: Vec<Value> = matching
        .into_iter()
        .skip(page * size)
        .take(size)
        .cloned()
        .collect();

    Json(json!({
        "content": content,
        "last": (page + 1) * size >= total,
        "totalPages": total.div_ceil(size),
        "totalElements": total,
        "size": size,
        "number": page,
        "first": page == 0,
        "numberOfElements": content.len(),
    }))
}

async fn find_user(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    state.hit();
    let users = state.users.lock().unwrap();
    users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_user(
    State(state): State<Arc<MockState>>,
    Json(mut user): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hit();
    let mut users = state.users.lock().unwrap();
    let id = users.keys().next_back().copied().unwrap_or(0) + 1;
    user["id"] = json!(id);
    users.insert(id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(mut user): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.hit();
    let mut users = state.users.lock().unwrap();
    if !users.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    user["id"] = json!(id);
    users.insert(id, user.clone());
    Ok(Json(user))
}

async fn delete_user(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> StatusCode {
    state.hit();
    match state.users.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn export_users(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    let users = state.users.lock().unwrap();
    let mut csv = String::from("id,name\n");
    for user in users.values() {
        csv.push_str(&format!("{},{}\n", user["id"], user["name"].as_str().unwrap_or("")));
    }
    ([(header::CONTENT_TYPE, "text/csv")], csv).into_response()
}

async fn unauthorized(State(state): State<Arc<MockState>>) -> StatusCode {
    state.hit();
    StatusCode::UNAUTHORIZED
}

async fn echo(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Value> {
    state.hit();
    let headers: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                json!(value.to_str().unwrap_or_default()),
            )
        })
        .collect();
    Json(json!({ "headers": headers, "query": params }))
}

/// Reads the body whatever its content type
async fn login(State(state): State<Arc<MockState>>, body: String) -> Response {
    state.hit();
    let credentials: Value = serde_json::from_str(&body).unwrap_or_default();
    if credentials["password"] == PASSWORD {
        Json(json!({"login": credentials["username"], "roles": ["user"]})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
    }
}

async fn logout(State(state): State<Arc<MockState>>) -> StatusCode {
    state.hit();
    StatusCode::OK
}
