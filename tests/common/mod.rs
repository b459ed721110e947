//! In-process mock of the help desk API used by the integration tests

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USER_TOKEN: &str = "user-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const LOGIN_CODE: &str = "424242";
/// A token the profile endpoint answers with a server error
pub const BROKEN_TOKEN: &str = "broken-token";

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    tickets: Mutex<Vec<Value>>,
    settings: Mutex<Vec<Value>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockState {
    fn record(&self, method: &str, path: &str, headers: &HeaderMap, query: HashMap<String, String>, body: Value) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path: path.to_string(),
            query,
            authorization,
            body,
        });
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn role_for(headers: &HeaderMap) -> Option<&'static str> {
    match bearer(headers) {
        Some(USER_TOKEN) => Some("user"),
        Some(ADMIN_TOKEN) => Some("admin"),
        _ => None,
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid token"}))).into_response()
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({"detail": "Admins only"}))).into_response()
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": format!("{what} not found")}))).into_response()
}

type Shared = State<Arc<MockState>>;

async fn login(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/login", &headers, HashMap::new(), body.clone());
    let token = match (body["username"].as_str(), body["password"].as_str()) {
        (Some("maria"), Some("secret")) => USER_TOKEN,
        (Some("admin"), Some("secret")) => ADMIN_TOKEN,
        _ => return unauthorized(),
    };
    Json(json!({"token": token, "refresh_token": format!("refresh-{token}")})).into_response()
}

async fn login_code(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/login-code", &headers, HashMap::new(), body.clone());
    if body["code"] == LOGIN_CODE {
        Json(json!({"token": USER_TOKEN, "refresh_token": "refresh-code"})).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid code"}))).into_response()
    }
}

async fn refresh(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/refresh", &headers, HashMap::new(), body.clone());
    match body["refresh_token"].as_str() {
        Some(t) if t.starts_with("refresh-") => {
            Json(json!({"token": USER_TOKEN, "refresh_token": "refresh-rotated"})).into_response()
        },
        _ => unauthorized(),
    }
}

async fn me(State(state): Shared, headers: HeaderMap) -> Response {
    state.record("GET", "/auth/me", &headers, HashMap::new(), Value::Null);
    if bearer(&headers) == Some(BROKEN_TOKEN) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "Database unavailable"})))
            .into_response();
    }
    match role_for(&headers) {
        Some("admin") => Json(json!({"user_id": 1, "username": "admin", "name": "Ada Admin", "role": "admin"})).into_response(),
        Some(_) => Json(json!({"user_id": 7, "username": "maria", "name": "Maria Lopez", "role": "user"})).into_response(),
        None => unauthorized(),
    }
}

async fn list_users(State(state): Shared, headers: HeaderMap) -> Response {
    state.record("GET", "/auth/user/list", &headers, HashMap::new(), Value::Null);
    match role_for(&headers) {
        Some("admin") => Json(json!({"users": [
            {"user_id": 1, "username": "admin", "name": "Ada Admin", "role": "admin"},
            {"id": "7", "username": "maria", "name": "Maria Lopez", "role": "user"}
        ]}))
        .into_response(),
        Some(_) => forbidden(),
        None => unauthorized(),
    }
}

async fn create_user(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/user", &headers, HashMap::new(), body.clone());
    if role_for(&headers) != Some("admin") {
        return forbidden();
    }
    Json(json!({"message": "User created", "username": body["username"]})).into_response()
}

async fn update_user(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("PATCH", "/auth/user", &headers, HashMap::new(), body.clone());
    if role_for(&headers) != Some("admin") {
        return forbidden();
    }
    Json(json!({"message": "User updated"})).into_response()
}

async fn generate_code(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/generate-code", &headers, HashMap::new(), body);
    if role_for(&headers) != Some("admin") {
        return forbidden();
    }
    let expires_at = chrono::Utc::now().timestamp() + 60;
    Json(json!({"code": "123456", "expires_at": expires_at})).into_response()
}

async fn register_fcm(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/fcm", &headers, HashMap::new(), body);
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_settings(State(state): Shared, headers: HeaderMap) -> Response {
    state.record("GET", "/auth/settings", &headers, HashMap::new(), Value::Null);
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let settings = state.settings.lock().unwrap().clone();
    Json(json!({"settings": settings})).into_response()
}

async fn get_setting(State(state): Shared, headers: HeaderMap, Path(key): Path<String>) -> Response {
    state.record("GET", &format!("/auth/settings/{key}"), &headers, HashMap::new(), Value::Null);
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let settings = state.settings.lock().unwrap();
    match settings.iter().find(|s| s["key_id"] == key.as_str()) {
        Some(setting) => Json(setting.clone()).into_response(),
        None => not_found("Setting"),
    }
}

async fn update_setting(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/auth/settings", &headers, HashMap::new(), body.clone());
    if role_for(&headers) != Some("admin") {
        return forbidden();
    }
    let mut settings = state.settings.lock().unwrap();
    settings.retain(|s| s["key_id"] != body["key_id"]);
    settings.push(json!({"key_id": body["key_id"], "data": body["data"], "updated_by": 1}));
    Json(json!({"message": "Setting updated"})).into_response()
}

async fn list_tickets(
    State(state): Shared,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record("GET", "/tickets", &headers, query.clone(), Value::Null);
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let wanted = query.get("status").cloned().unwrap_or_else(|| "open".to_string());
    let tickets: Vec<Value> = state
        .tickets
        .lock()
        .unwrap()
        .iter()
        .filter(|t| t["status"] == wanted.as_str())
        .cloned()
        .collect();
    // The closed tab answers with the wrapped shape, the open tab with a bare array
    if wanted == "closed" {
        Json(json!({"tickets": tickets})).into_response()
    } else {
        Json(Value::Array(tickets)).into_response()
    }
}

async fn create_ticket(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/tickets/create", &headers, HashMap::new(), body.clone());
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let mut tickets = state.tickets.lock().unwrap();
    let id = tickets.len() + 100;
    let mut ticket = body;
    ticket["ticket_id"] = json!(id);
    ticket["ticket_number"] = json!(format!("HD-{id}"));
    ticket["status"] = json!("open");
    ticket["created_at"] = json!("2024-06-01T12:00:00Z");
    ticket["created_by"] = json!(7);
    tickets.push(ticket.clone());
    Json(ticket).into_response()
}

fn find_ticket(state: &MockState, id: &str) -> Option<Value> {
    state
        .tickets
        .lock()
        .unwrap()
        .iter()
        .find(|t| t["ticket_id"].to_string().trim_matches('"') == id)
        .cloned()
}

fn with_ticket(state: &MockState, id: &str, change: impl FnOnce(&mut Value)) -> Option<Value> {
    let mut tickets = state.tickets.lock().unwrap();
    let ticket = tickets
        .iter_mut()
        .find(|t| t["ticket_id"].to_string().trim_matches('"') == id)?;
    change(ticket);
    Some(ticket.clone())
}

async fn get_ticket(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    state.record("GET", &format!("/tickets/{id}"), &headers, HashMap::new(), Value::Null);
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    match find_ticket(&state, &id) {
        Some(ticket) => Json(ticket).into_response(),
        None => not_found("Ticket"),
    }
}

async fn update_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record("PATCH", &format!("/tickets/{id}"), &headers, HashMap::new(), body.clone());
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let updated = with_ticket(&state, &id, |ticket| {
        if let Some(fields) = body.as_object() {
            for (key, value) in fields {
                ticket[key] = value.clone();
            }
        }
    });
    updated.map_or_else(|| not_found("Ticket"), |t| Json(t).into_response())
}

async fn reply_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", &format!("/tickets/{id}/reply"), &headers, HashMap::new(), body.clone());
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let updated = with_ticket(&state, &id, |ticket| {
        let mut replies = ticket["replies"].as_array().cloned().unwrap_or_default();
        let next_id = replies.len() + 1;
        replies.push(json!({
            "reply_id": next_id,
            "message": body["message"],
            "author": 7,
            "author_name": "Maria Lopez",
            "created_at": "2024-06-02T08:00:00Z"
        }));
        ticket["replies"] = Value::Array(replies);
    });
    updated.map_or_else(|| not_found("Ticket"), |_| Json(json!({"message": "Reply added"})).into_response())
}

async fn solve_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record("PATCH", &format!("/tickets/{id}/solution"), &headers, HashMap::new(), body.clone());
    if role_for(&headers).is_none() {
        return unauthorized();
    }
    let updated = with_ticket(&state, &id, |ticket| {
        if !body["solution"].is_null() {
            ticket["solution_reply_id"] = body["solution"].clone();
        }
        if let Some(status) = body["status"].as_str() {
            ticket["status"] = json!(status);
        }
    });
    updated.map_or_else(|| not_found("Ticket"), |t| Json(t).into_response())
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({"done": true})).into_response()
}

async fn text() -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], "pong").into_response()
}

/// Tickets every mock server starts with
fn seed_tickets() -> Vec<Value> {
    vec![
        json!({
            "ticket_id": "1", "title": "Broken heater", "status": "open",
            "created_at": "2024-01-05T09:00:00Z", "facility": "SPRINGWELL", "category": "FACILITY",
            "ticket_number": 1001, "created_by": 7, "created_by_name": "Maria Lopez",
            "description": "Room 12 is cold"
        }),
        json!({
            "ticket_id": 2, "title": "Staff schedule", "status": "open",
            "created_at": "2024-03-01T09:00:00Z", "facility": "DANA POINT", "category": "STAFF",
            "created_by": 3
        }),
        json!({
            "ticket_id": "3", "title": "Visitor badge", "status": "closed",
            "created_at": "2023-12-01T09:00:00Z", "facility": "GOLDEN BREEZE", "category": "RESIDENT",
            "solution_reply_id": 1,
            "replies": [{"reply_id": 1, "message": "Badge printed", "author": 1}]
        }),
        json!({"ticket_id": "a/b", "title": "Slash id", "status": "pending"}),
    ]
}

fn seed_settings() -> Vec<Value> {
    vec![
        json!({"key_id": "facility_options", "data": {"facility": ["NORTH WING", "SOUTH WING"]}}),
        json!({"key_id": "welcome", "data": {"text": "Hello"}, "updated_by_name": "Ada Admin"}),
    ]
}

/// Handle on a running mock server
#[derive(Clone)]
pub struct MockServer {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockServer {
    fn router(state: Arc<MockState>) -> Router {
        Router::new()
            .route("/v1/auth/login", post(login))
            .route("/v1/auth/login-code", post(login_code))
            .route("/v1/auth/refresh", post(refresh))
            .route("/v1/auth/me", get(me))
            .route("/v1/auth/user/list", get(list_users))
            .route("/v1/auth/user", post(create_user).patch(update_user))
            .route("/v1/auth/generate-code", post(generate_code))
            .route("/v1/auth/fcm", post(register_fcm))
            .route("/v1/auth/settings", get(list_settings).post(update_setting))
            .route("/v1/auth/settings/:key_id", get(get_setting))
            .route("/v1/tickets", get(list_tickets))
            .route("/v1/tickets/create", post(create_ticket))
            .route("/v1/tickets/:id", get(get_ticket).patch(update_ticket))
            .route("/v1/tickets/:id/reply", post(reply_ticket))
            .route("/v1/tickets/:id/solution", patch(solve_ticket))
            .route("/v1/slow", get(slow))
            .route("/v1/text", get(text))
            .with_state(state)
    }

    /// Start the server on the current runtime
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            tickets: Mutex::new(seed_tickets()),
            settings: Mutex::new(seed_settings()),
            requests: Mutex::new(Vec::new()),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Self::router(Arc::clone(&state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}/v1"),
            state,
        }
    }

    /// Start the server on a background thread, for tests without a runtime
    pub fn start_in_background() -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                tx.send(Self::start().await).unwrap();
                std::future::pending::<()>().await;
            });
        });
        rx.recv().unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}
