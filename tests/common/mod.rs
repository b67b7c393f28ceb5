//! In-process mock of the blog backend.
//!
//! Binds to `127.0.0.1:0` and serves the `/api` routes the client talks to,
//! with just enough behavior to exercise success and failure paths.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use blog_api::client::BlogClient;

pub const ADMIN_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
pub const ADMIN_TOKEN: &str = "abc";
pub const ADMIN_PASSWORD: &str = "secret";
/// Accepted by the auth middleware but answered `false` by `auth/validate`.
pub const STALE_TOKEN: &str = "stale";
pub const CREATED_AT: &str = "2024-01-15T10:30:00";

#[derive(Clone)]
pub struct MockUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl MockUser {
    fn full(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "createdAt": CREATED_AT,
            "updatedAt": null,
            "lastLogin": CREATED_AT,
        })
    }

    fn public(&self) -> Value {
        json!({ "id": self.id, "username": self.username, "createdAT": CREATED_AT })
    }

    fn with_token(&self, token: &str) -> Value {
        let mut body = self.full();
        body["token"] = json!(token);
        body
    }
}

#[derive(Default)]
pub struct MockState {
    pub users: Vec<MockUser>,
    pub tokens: HashMap<String, Uuid>,
    pub posts: Vec<Value>,
    pub muted: Vec<Uuid>,
    /// `Authorization` header seen by `auth/validate`, in call order.
    pub validate_calls: Vec<Option<String>>,
    pub logout_calls: usize,
    pub fail_logout: bool,
    /// When set, `users/me` answers with this body instead of the caller.
    pub me_override: Option<Value>,
}

impl MockState {
    fn user_by_token(&self, headers: &HeaderMap) -> Option<MockUser> {
        let token = bearer(headers)?;
        let id = self.tokens.get(&token)?;
        self.users.iter().find(|u| u.id == *id).cloned()
    }

    fn issue_token(&mut self, user: &MockUser) -> String {
        let token = if user.username == "admin" {
            ADMIN_TOKEN.to_string()
        } else {
            format!("tok-{}", Uuid::new_v4())
        };
        self.tokens.insert(token.clone(), user.id);
        token
    }
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub host: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let admin = MockUser {
            id: ADMIN_ID.parse().unwrap(),
            username: "admin".to_string(),
            password: ADMIN_PASSWORD.to_string(),
            email: "admin@example.com".to_string(),
        };
        let mut state = MockState::default();
        state.tokens.insert(STALE_TOKEN.to_string(), admin.id);
        state.users.push(admin);
        let state: Shared = Arc::new(Mutex::new(state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            host: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> BlogClient {
        BlogClient::builder().host(&self.host).build().unwrap()
    }

    pub fn add_user(&self, username: &str) -> Uuid {
        let user = MockUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: "pw".to_string(),
            email: format!("{}@example.com", username),
        };
        let id = user.id;
        self.state.lock().unwrap().users.push(user);
        id
    }
}

/// An unsigned JWT carrying the backend's user-id and name claims.
pub fn jwt_for(user_id: &str, username: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#);
    let payload = json!({
        "http://schemas.microsoft.com/ws/2008/06/identity/claims/userdata": format!("\"{}\"", user_id),
        "unique_name": username,
        "exp": 1_900_000_000,
    });
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.sig", header, body)
}

fn app(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/validate", get(validate))
        .route("/api/auth/refresh-token", post(refresh_token))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/change-password", post(change_password))
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(me))
        .route("/api/users/by-name/{name}", get(user_by_name))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/posts", get(user_posts))
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/muted-users", get(list_muted).post(mute))
        .route("/api/muted-users/{id}", axum::routing::delete(unmute))
        .route("/api/test/headers", get(echo_headers))
        .route("/api/test/text", get(|| async { "hello" }))
        .route("/api/test/empty", get(|| async { StatusCode::OK }))
        .route("/api/test/blank", get(|| async { " \n" }))
        .route(
            "/api/test/teapot",
            get(|| async {
                (
                    StatusCode::IM_A_TEAPOT,
                    Json(json!({ "message": "short and stout", "code": 7 })),
                )
            }),
        )
        .route(
            "/api/test/crash",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>") }),
        )
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{} cannot be found.", what)).into_response()
}

fn problem(status: StatusCode, problem_type: &str, title: &str, detail: &str) -> Response {
    (
        status,
        Json(json!({
            "type": problem_type,
            "title": title,
            "status": status.as_u16(),
            "detail": detail,
            "traceId": "00-mock-00",
        })),
    )
        .into_response()
}

fn validation(field: &str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "type": "https://tools.ietf.org/html/rfc9110#section-15.5.1",
            "title": "One or more validation errors occurred.",
            "status": 400,
            "errors": { field: [message] },
            "traceId": "00-mock-00",
        })),
    )
        .into_response()
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
    #[serde(default)]
    email: Option<String>,
}

async fn login(State(state): State<Shared>, Json(input): Json<Credentials>) -> Response {
    let mut state = state.lock().unwrap();
    let user = state
        .users
        .iter()
        .find(|u| u.username == input.username && u.password == input.password)
        .cloned();
    match user {
        Some(user) => {
            let token = state.issue_token(&user);
            Json(user.with_token(&token)).into_response()
        }
        None => (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response(),
    }
}

async fn register(State(state): State<Shared>, Json(input): Json<Credentials>) -> Response {
    let mut state = state.lock().unwrap();
    if input.username == "taken" || state.users.iter().any(|u| u.username == input.username) {
        return problem(
            StatusCode::BAD_REQUEST,
            "Bad Request",
            "Username Already in Use",
            "The username provided is already associated with an existing account.",
        );
    }
    let user = MockUser {
        id: Uuid::new_v4(),
        username: input.username,
        password: input.password,
        email: input.email.unwrap_or_default(),
    };
    state.users.push(user.clone());
    let token = state.issue_token(&user);
    Json(user.with_token(&token)).into_response()
}

async fn validate(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.validate_calls.push(bearer(&headers));
    match bearer(&headers) {
        Some(token) if token == STALE_TOKEN => Json(false).into_response(),
        Some(token) if state.tokens.contains_key(&token) => Json(true).into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn refresh_token(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user) = state.user_by_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let token = format!("rotated-{}", state.tokens.len());
    state.tokens.insert(token.clone(), user.id);
    Json(user.with_token(&token)).into_response()
}

async fn logout(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    state.logout_calls += 1;
    if state.fail_logout {
        return (StatusCode::INTERNAL_SERVER_ERROR, "logout failed").into_response();
    }
    StatusCode::OK.into_response()
}

#[derive(Deserialize)]
struct NewPassword {
    password: String,
}

async fn change_password(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<NewPassword>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user) = state.user_by_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if input.password.is_empty() {
        return validation("Password", "The Password field is required.");
    }
    if let Some(u) = state.users.iter_mut().find(|u| u.id == user.id) {
        u.password = input.password;
    }
    StatusCode::OK.into_response()
}

// ── Users ────────────────────────────────────────────────────────────────────

async fn list_users(State(state): State<Shared>) -> Json<Vec<Value>> {
    let state = state.lock().unwrap();
    Json(state.users.iter().map(MockUser::public).collect())
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user) = state.user_by_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    match &state.me_override {
        Some(body) => Json(body.clone()).into_response(),
        None => Json(user.full()).into_response(),
    }
}

async fn get_user(State(state): State<Shared>, Path(id): Path<Uuid>) -> Response {
    let state = state.lock().unwrap();
    match state.users.iter().find(|u| u.id == id) {
        Some(u) => Json(u.public()).into_response(),
        None => not_found(&format!("User with ID {}", id)),
    }
}

async fn user_by_name(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let state = state.lock().unwrap();
    match state.users.iter().find(|u| u.username == name) {
        Some(u) => Json(u.public()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!(format!("User named {} doesn't exist.", name))),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct UserChanges {
    username: Option<String>,
    email: Option<String>,
}

async fn update_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UserChanges>,
) -> Response {
    let mut state = state.lock().unwrap();
    match state.user_by_token(&headers) {
        Some(caller) if caller.id == id => {}
        _ => return (StatusCode::UNAUTHORIZED, "Cannot update someone else's account yet.").into_response(),
    }
    let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
        return not_found(&format!("User with ID {}", id));
    };
    let mut fields = Vec::new();
    if let Some(username) = input.username {
        user.username = username;
        fields.push("Username");
    }
    if let Some(email) = input.email {
        user.email = email;
        fields.push("Email");
    }
    Json(json!({ "updated": !fields.is_empty(), "updatedFields": fields })).into_response()
}

async fn delete_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let mut state = state.lock().unwrap();
    match state.user_by_token(&headers) {
        Some(caller) if caller.id == id => {}
        _ => return (StatusCode::UNAUTHORIZED, "Cannot delete someone else's account.").into_response(),
    }
    state.users.retain(|u| u.id != id);
    StatusCode::OK.into_response()
}

async fn user_posts(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let state = state.lock().unwrap();
    if !state.users.iter().any(|u| u.id == id) {
        return not_found(&format!("Post with {}", id));
    }
    let logged_in = state.user_by_token(&headers).is_some();
    let posts: Vec<Value> = state
        .posts
        .iter()
        .filter(|p| p["userId"] == json!(id))
        .filter(|p| logged_in || p["registredUsersOnly"] != json!(true))
        .cloned()
        .collect();
    Json(posts).into_response()
}

// ── Posts ────────────────────────────────────────────────────────────────────

async fn list_posts(State(state): State<Shared>, headers: HeaderMap) -> Json<Vec<Value>> {
    let state = state.lock().unwrap();
    let logged_in = state.user_by_token(&headers).is_some();
    Json(
        state
            .posts
            .iter()
            .filter(|p| logged_in || p["registredUsersOnly"] != json!(true))
            .cloned()
            .collect(),
    )
}

#[derive(Deserialize)]
struct NewPost {
    caption: String,
    content: String,
    #[serde(rename = "registredUsersOnly", default)]
    registered_users_only: bool,
}

async fn create_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<NewPost>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user) = state.user_by_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if input.content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "Content": ["must not be empty"] } })),
        )
            .into_response();
    }
    let post = json!({
        "id": Uuid::new_v4(),
        "caption": input.caption,
        "content": input.content,
        "createdAt": CREATED_AT,
        "updatedAt": CREATED_AT,
        "userId": user.id,
        "user": user.public(),
        "registredUsersOnly": input.registered_users_only,
    });
    state.posts.push(post.clone());
    (StatusCode::CREATED, Json(post)).into_response()
}

fn post_not_found(id: Uuid) -> Response {
    problem(
        StatusCode::NOT_FOUND,
        "https://tools.ietf.org/html/rfc9110#section-15.5.5",
        "Not Found",
        &format!("Post with ID {} cannot be found.", id),
    )
}

async fn get_post(State(state): State<Shared>, Path(id): Path<Uuid>) -> Response {
    let state = state.lock().unwrap();
    match state.posts.iter().find(|p| p["id"] == json!(id)) {
        Some(p) => Json(p.clone()).into_response(),
        None => post_not_found(id),
    }
}

#[derive(Deserialize)]
struct PostChanges {
    caption: Option<String>,
    content: Option<String>,
    #[serde(rename = "registredUsersOnly")]
    registered_users_only: Option<bool>,
}

async fn update_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<PostChanges>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user) = state.user_by_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let Some(post) = state.posts.iter_mut().find(|p| p["id"] == json!(id)) else {
        return post_not_found(id);
    };
    if post["userId"] != json!(user.id) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let mut fields = Vec::new();
    if let Some(caption) = input.caption {
        post["caption"] = json!(caption);
        fields.push("Caption");
    }
    if let Some(content) = input.content {
        post["content"] = json!(content);
        fields.push("Content");
    }
    if let Some(only) = input.registered_users_only {
        post["registredUsersOnly"] = json!(only);
        fields.push("RegistredUsersOnly");
    }
    Json(json!({ "updated": !fields.is_empty(), "updatedFields": fields })).into_response()
}

async fn delete_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user) = state.user_by_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let Some(index) = state.posts.iter().position(|p| p["id"] == json!(id)) else {
        return post_not_found(id);
    };
    if state.posts[index]["userId"] != json!(user.id) {
        return StatusCode::FORBIDDEN.into_response();
    }
    state.posts.remove(index);
    Json(json!({ "success": true })).into_response()
}

// ── Mutes ────────────────────────────────────────────────────────────────────

async fn list_muted(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if state.user_by_token(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let muted: Vec<Value> = state
        .users
        .iter()
        .filter(|u| state.muted.contains(&u.id))
        .map(MockUser::public)
        .collect();
    Json(muted).into_response()
}

async fn mute(State(state): State<Shared>, headers: HeaderMap, Json(id): Json<Uuid>) -> Response {
    let mut state = state.lock().unwrap();
    if state.user_by_token(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if !state.users.iter().any(|u| u.id == id) {
        return not_found(&format!("User with ID {}", id));
    }
    if !state.muted.contains(&id) {
        state.muted.push(id);
    }
    StatusCode::OK.into_response()
}

async fn unmute(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.user_by_token(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if !state.muted.contains(&id) {
        return problem(
            StatusCode::BAD_REQUEST,
            "Invalid Request",
            "User not muted",
            &format!("The user with the ID {} is not muted.", id),
        );
    }
    state.muted.retain(|m| *m != id);
    StatusCode::OK.into_response()
}

// ── Dispatcher probes ────────────────────────────────────────────────────────

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let map: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                json!(value.to_str().unwrap_or_default()),
            )
        })
        .collect();
    Json(Value::Object(map))
}
