#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use axum_todo_users_api::{
    db::{self, DbPool},
    route::create_router,
    AppState,
};

pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build the full application router backed by a fresh in-memory database.
pub async fn build_test_app() -> Router {
    build_test_app_with_pool(build_test_pool().await)
}

/// A fresh in-memory database with the schema applied.
///
/// The pool holds a single connection that is never recycled, since every
/// new connection to `sqlite::memory:` would open an empty database.
pub async fn build_test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

pub fn build_test_app_with_pool(pool: DbPool) -> Router {
    create_router(
        Arc::new(AppState { db: pool }),
        vec![HeaderValue::from_static(TEST_ORIGIN)],
    )
}

/// Send a request with an optional JSON body, returning the status and the
/// parsed body (`Value::Null` when the body is empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    dispatch(app, request).await
}

/// Send a raw body, with an optional content type, to exercise rejections.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    dispatch(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// Create a user and return its `data` object.
pub async fn create_user(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({ "username": username, "email": format!("{username}@example.com") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["data"].clone()
}

/// Create a todo for `user_id` and return its `data` object.
pub async fn create_todo(app: &Router, user_id: i64, title: &str, content: Option<&str>) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/todos",
        Some(json!({ "userId": user_id, "title": title, "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["data"].clone()
}
