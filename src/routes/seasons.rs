use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::AppState;
use crate::errors::AppResult;
use crate::models::{NewSeason, Season, SeasonOverview};
use crate::routes::CurrentUser;
use crate::services::{self, SeasonCalendar};

pub async fn create(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(group_id): Path<String>,
  Json(body): Json<NewSeason>,
) -> AppResult<Json<Season>> {
  let season = services::create_season(&state.db, &group_id, &user.0, body, Utc::now()).await?;
  Ok(Json(season))
}

pub async fn overview(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(group_id): Path<String>,
) -> AppResult<Json<SeasonOverview>> {
  let overview = services::season_overview(&state.db, &group_id, &user.0, Utc::now()).await?;
  Ok(Json(overview))
}

#[derive(Deserialize)]
pub struct CalendarParams {
  pub user_id: Option<String>,
}

pub async fn calendar(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(season_id): Path<String>,
  Query(params): Query<CalendarParams>,
) -> AppResult<Json<SeasonCalendar>> {
  let reference_now = Utc::now();
  let calendar = services::season_calendar(
    &state.db,
    &season_id,
    &user.0,
    params.user_id,
    reference_now,
  )
  .await?;
  Ok(Json(calendar))
}
