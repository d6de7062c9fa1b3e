//! HTTP surface
//!
//! Thin handlers over the service layer. Identity arrives as an `x-user-id`
//! header set by the auth proxy in front of this service; each handler
//! reads the clock exactly once so every computation in a request agrees
//! on "now".

pub mod activities;
pub mod groups;
pub mod profile;
pub mod seasons;
pub mod users;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::AppState;
use crate::errors::AppError;

/// The authenticated user's id, taken from the `x-user-id` header.
pub struct CurrentUser(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .headers
      .get("x-user-id")
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|id| !id.is_empty())
      .map(|id| CurrentUser(id.to_string()))
      .ok_or(AppError::Unauthorized)
  }
}

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/api/health", get(health))
    .route("/api/users", post(users::create))
    .route("/api/groups", post(groups::create))
    .route("/api/groups/:id/join", post(groups::join))
    .route("/api/groups/:id/leave", post(groups::leave))
    .route("/api/groups/:id/activities", get(groups::feed))
    .route("/api/groups/:id/ranking", get(groups::ranking))
    .route(
      "/api/groups/:id/seasons",
      post(seasons::create).get(seasons::overview),
    )
    .route("/api/seasons/:id/calendar", get(seasons::calendar))
    .route(
      "/api/activities",
      post(activities::create).get(activities::list),
    )
    .route("/api/profile/stats", get(profile::stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "status": "ok" }))
}
