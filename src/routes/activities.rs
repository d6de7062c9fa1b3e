use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::AppState;
use crate::errors::AppResult;
use crate::models::{Activity, NewActivity};
use crate::routes::CurrentUser;
use crate::services;

const DEFAULT_LIST_LIMIT: i64 = 50;

pub async fn create(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Json(body): Json<NewActivity>,
) -> AppResult<Json<Activity>> {
  let activity = services::create_activity(&state.db, &user.0, body, Utc::now()).await?;
  Ok(Json(activity))
}

#[derive(Deserialize)]
pub struct ListParams {
  pub limit: Option<i64>,
}

pub async fn list(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Activity>>> {
  let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 200);
  let activities = services::recent_activities(&state.db, &user.0, limit).await?;
  Ok(Json(activities))
}
