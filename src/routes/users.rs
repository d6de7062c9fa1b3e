use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use crate::db::AppState;
use crate::errors::AppResult;
use crate::models::{NewUser, User};
use crate::services;

pub async fn create(
  State(state): State<Arc<AppState>>,
  Json(body): Json<NewUser>,
) -> AppResult<Json<User>> {
  let user = services::create_user(&state.db, body, Utc::now()).await?;
  Ok(Json(user))
}
