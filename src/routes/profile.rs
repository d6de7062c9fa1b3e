use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::AppState;
use crate::errors::AppResult;
use crate::routes::CurrentUser;
use crate::services::{self, UserStats};

#[derive(Deserialize)]
pub struct StatsParams {
  pub weekly_required: Option<u32>,
}

pub async fn stats(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Query(params): Query<StatsParams>,
) -> AppResult<Json<UserStats>> {
  let reference_now = Utc::now();
  let stats =
    services::user_stats(&state.db, &user.0, params.weekly_required, reference_now).await?;
  Ok(Json(stats))
}
