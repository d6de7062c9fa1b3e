//! Shared test plumbing: an app over a fresh in-memory database and a
//! compact request helper.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

use rachas::db::AppState;
use rachas::routes;

pub async fn test_app() -> Router {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .unwrap();
  sqlx::migrate!("./migrations").run(&pool).await.unwrap();
  routes::router(Arc::new(AppState { db: pool }))
}

/// Sends one request and returns the status plus the parsed JSON body.
pub async fn send(
  app: &Router,
  method: &str,
  path: &str,
  user: Option<&str>,
  body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
  let mut builder = Request::builder().method(method).uri(path);
  if let Some(user) = user {
    builder = builder.header("x-user-id", user);
  }
  let request = match body {
    Some(body) => builder
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    serde_json::Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}
