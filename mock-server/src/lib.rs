use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct BlobParams {
    pub size: usize,
}

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    users: Db,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

/// Router serving a small user API. Everything under `/api/users` requires
/// `Authorization: Bearer <token>`.
pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        users: Db::default(),
    };

    let protected = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .merge(protected)
        .route("/api/health", get(health))
        .route("/api/echo", any(echo))
        .route("/api/fail", get(fail))
        .route("/api/blob", get(blob))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == &*state.token => Ok(next.run(request).await),
        _ => Err(api_error(StatusCode::UNAUTHORIZED, "Missing or invalid bearer token")),
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn fail() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal failure")
}

/// `{"data": "aaa..."}` with `size` filler bytes, for large-body tests.
async fn blob(Query(params): Query<BlobParams>) -> Json<Value> {
    Json(json!({ "data": "a".repeat(params.size) }))
}

/// Reflect what the server received, without requiring auth.
async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    body: String,
) -> Json<Value> {
    let header_value = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "content_type": header_value(header::CONTENT_TYPE),
        "authorization": header_value(header::AUTHORIZATION),
        "body": body,
    }))
}

async fn list_users(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Vec<User>> {
    let users = state.users.read().await;
    let mut matching: Vec<User> = users
        .values()
        .filter(|user| params.name.as_deref().map_or(true, |name| user.name == name))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name));
    Json(matching)
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
    };
    state.users.write().await.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<User>, ApiError> {
    let users = state.users.read().await;
    users
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "User not found"))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, ApiError> {
    let mut users = state.users.write().await;
    let user = users
        .get_mut(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "User not found"))?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    let mut users = state.users.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "User not found"))
}
