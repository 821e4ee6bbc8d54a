//! In-memory stand-in for the admin backend's connection API.
//!
//! Besides serving connections, the server can be told to misbehave: every
//! queued `Fault` answers (or stalls) exactly one incoming request before
//! routing happens, and `Faults::hits` counts every request received. Tests
//! use both to assert how many attempts a client made.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    pub id: String,
    pub name: String,
    pub hosts: Vec<String>,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnection {
    pub name: String,
    pub hosts: Vec<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub cluster_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConnection {
    pub name: Option<String>,
    pub hosts: Option<Vec<String>>,
    pub port: Option<u16>,
    pub cluster_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize)]
pub struct TestConnection {
    pub hosts: Vec<String>,
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

fn default_color() -> String {
    "#0097D3".to_string()
}

/// A scripted misbehavior for the next request.
#[derive(Clone, Debug)]
pub enum Fault {
    /// Respond with `status` and a JSON body.
    Json { status: StatusCode, body: Value },
    /// Respond with `status` and a plain-text body.
    Text { status: StatusCode, body: String },
    /// Sleep before handling the request normally.
    Stall(Duration),
}

impl Fault {
    pub fn json(status: u16, body: Value) -> Self {
        Fault::Json {
            status: status_code(status),
            body,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Fault::Text {
            status: status_code(status),
            body: body.to_string(),
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Shared handle for queueing faults and counting requests.
#[derive(Clone, Debug, Default)]
pub struct Faults {
    queue: Arc<Mutex<VecDeque<Fault>>>,
    hits: Arc<AtomicUsize>,
}

impl Faults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, fault: Fault) {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(fault);
    }

    /// Queue the same fault `times` times.
    pub fn repeat(&self, fault: Fault, times: usize) {
        for _ in 0..times {
            self.push(fault.clone());
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn next(&self) -> Option<Fault> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }
}

pub type Db = Arc<RwLock<HashMap<String, ConnectionProfile>>>;

#[derive(Clone, Default)]
pub struct AppState {
    pub db: Db,
    pub faults: Faults,
}

impl AppState {
    pub fn new(faults: Faults) -> Self {
        Self {
            db: Db::default(),
            faults,
        }
    }
}

pub fn app() -> Router {
    router(AppState::default())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/connections",
            get(list_connections).post(create_connection),
        )
        .route("/api/connections/test", post(test_connection))
        .route(
            "/api/connections/{id}",
            get(get_connection)
                .put(update_connection)
                .delete(delete_connection),
        )
        .route("/api/connections/{id}/health", get(connection_health))
        .layer(middleware::from_fn_with_state(
            state.faults.clone(),
            inject_faults,
        ))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

async fn inject_faults(State(faults): State<Faults>, request: Request, next: Next) -> Response {
    faults.hits.fetch_add(1, Ordering::SeqCst);
    match faults.next() {
        Some(Fault::Json { status, body }) => {
            tracing::debug!(%status, uri = %request.uri(), "injecting json fault");
            (status, Json(body)).into_response()
        }
        Some(Fault::Text { status, body }) => {
            tracing::debug!(%status, uri = %request.uri(), "injecting text fault");
            (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
        }
        Some(Fault::Stall(delay)) => {
            tracing::debug!(?delay, uri = %request.uri(), "stalling request");
            tokio::time::sleep(delay).await;
            next.run(request).await
        }
        None => next.run(request).await,
    }
}

/// Error body in the shape the console expects.
fn not_found(id: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": format!("Connection '{id}' not found"),
            "code": "CONNECTION_NOT_FOUND",
        })),
    )
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_connections(State(state): State<AppState>) -> Json<Vec<ConnectionProfile>> {
    let connections = state.db.read().await;
    let mut all: Vec<_> = connections.values().cloned().collect();
    all.sort_by(|a, b| a.id.cmp(&b.id));
    Json(all)
}

async fn create_connection(
    State(state): State<AppState>,
    Json(input): Json<CreateConnection>,
) -> (StatusCode, Json<ConnectionProfile>) {
    let simple = Uuid::new_v4().simple().to_string();
    let timestamp = now();
    let conn = ConnectionProfile {
        id: format!("conn-{}", &simple[..12]),
        name: input.name,
        hosts: input.hosts,
        port: input.port,
        cluster_name: input.cluster_name,
        username: input.username,
        password: input.password,
        color: input.color,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    state.db.write().await.insert(conn.id.clone(), conn.clone());
    (StatusCode::CREATED, Json(conn))
}

async fn get_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConnectionProfile>, (StatusCode, Json<Value>)> {
    let connections = state.db.read().await;
    connections
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn update_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateConnection>,
) -> Result<Json<ConnectionProfile>, (StatusCode, Json<Value>)> {
    let mut connections = state.db.write().await;
    let conn = connections.get_mut(&id).ok_or_else(|| not_found(&id))?;
    if let Some(name) = input.name {
        conn.name = name;
    }
    if let Some(hosts) = input.hosts {
        conn.hosts = hosts;
    }
    if let Some(port) = input.port {
        conn.port = port;
    }
    if input.cluster_name.is_some() {
        conn.cluster_name = input.cluster_name;
    }
    if input.username.is_some() {
        conn.username = input.username;
    }
    if input.password.is_some() {
        conn.password = input.password;
    }
    if let Some(color) = input.color {
        conn.color = color;
    }
    conn.updated_at = now();
    Ok(Json(conn.clone()))
}

async fn delete_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut connections = state.db.write().await;
    connections
        .remove(&id)
        .map(|_| Json(json!({ "message": "Connection deleted" })))
        .ok_or_else(|| not_found(&id))
}

async fn connection_health(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let connections = state.db.read().await;
    let conn = connections.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(json!({
        "connected": true,
        "nodeCount": conn.hosts.len(),
        "namespaceCount": 1,
        "build": "8.1.0.0",
        "edition": "Community",
    })))
}

async fn test_connection(Json(input): Json<TestConnection>) -> Json<Value> {
    if input.hosts.is_empty() {
        return Json(json!({ "success": false, "message": "No hosts given" }));
    }
    Json(json!({
        "success": true,
        "message": format!("Connected successfully to {} on port {}", input.hosts.join(","), input.port),
    }))
}
