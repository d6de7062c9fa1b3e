use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::AppState;
use crate::errors::AppResult;
use crate::models::{Group, GroupMember, NewGroup};
use crate::ranking::MemberStanding;
use crate::routes::CurrentUser;
use crate::services::{self, FeedActivity};

pub async fn create(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Json(body): Json<NewGroup>,
) -> AppResult<Json<Group>> {
  let group = services::create_group(&state.db, &user.0, body, Utc::now()).await?;
  Ok(Json(group))
}

pub async fn join(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(group_id): Path<String>,
) -> AppResult<Json<GroupMember>> {
  let member = services::join_group(&state.db, &group_id, &user.0, Utc::now()).await?;
  Ok(Json(member))
}

pub async fn leave(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(group_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
  services::leave_group(&state.db, &group_id, &user.0, Utc::now()).await?;
  Ok(Json(serde_json::json!({ "left": true })))
}

pub async fn feed(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(group_id): Path<String>,
) -> AppResult<Json<Vec<FeedActivity>>> {
  let feed = services::group_feed(&state.db, &group_id, &user.0).await?;
  Ok(Json(feed))
}

#[derive(Deserialize)]
pub struct RankingParams {
  pub weekly_required: Option<u32>,
}

pub async fn ranking(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  Path(group_id): Path<String>,
  Query(params): Query<RankingParams>,
) -> AppResult<Json<Vec<MemberStanding>>> {
  let reference_now = Utc::now();
  let standings = services::group_ranking(
    &state.db,
    &group_id,
    &user.0,
    params.weekly_required,
    reference_now,
  )
  .await?;
  Ok(Json(standings))
}
