//! Service layer between the HTTP routes and the database
//!
//! All instants that feed streak or calendar math are passed in by the
//! caller, so a whole request is evaluated against one clock reading.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{build_calendar, CalendarGrid};
use crate::db::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{
  Activity, Group, GroupMember, MemberRole, NewActivity, NewGroup, NewSeason, NewUser, Season,
  SeasonOverview, User,
};
use crate::ranking::{rank_members, MemberActivity, MemberStanding};
use crate::streaks::{compute_streaks, parse_timestamps, StreakConfig, StreakResult};

/// Most recent activities loaded per user for streak math.
pub const STATS_ACTIVITY_LIMIT: i64 = 200;

/// Weekly golden target when neither the request nor an active season
/// provides one.
pub const DEFAULT_WEEKLY_REQUIRED: u32 = 2;

fn new_id() -> String {
  Uuid::new_v4().to_string()
}

/// ---------------------------------------------------------------------------
/// Users
/// ---------------------------------------------------------------------------

pub async fn create_user(pool: &DbPool, new_user: NewUser, now: DateTime<Utc>) -> AppResult<User> {
  if new_user.email.trim().is_empty() {
    return Err(AppError::Validation("email must not be empty".into()));
  }

  let user = User {
    id: new_id(),
    name: new_user.name,
    email: new_user.email,
    photo_url: new_user.photo_url,
    created_at: now,
  };

  sqlx::query("INSERT INTO users (id, name, email, photo_url, created_at) VALUES (?, ?, ?, ?, ?)")
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.photo_url)
    .bind(user.created_at.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| match &e {
      sqlx::Error::Database(db) if db.is_unique_violation() => {
        AppError::Validation("email already registered".into())
      }
      _ => AppError::Database(e),
    })?;

  Ok(user)
}

pub async fn get_user(pool: &DbPool, user_id: &str) -> AppResult<User> {
  sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("user"))
}

/// ---------------------------------------------------------------------------
/// Groups and memberships
/// ---------------------------------------------------------------------------

pub async fn create_group(
  pool: &DbPool,
  creator_id: &str,
  new_group: NewGroup,
  now: DateTime<Utc>,
) -> AppResult<Group> {
  if new_group.name.trim().is_empty() {
    return Err(AppError::Validation("group name must not be empty".into()));
  }
  get_user(pool, creator_id).await?;

  let group = Group {
    id: new_id(),
    name: new_group.name,
    photo_url: new_group.photo_url,
    created_at: now,
  };

  // The group row and its admin membership land together or not at all; a
  // group without an admin could never get seasons.
  let mut tx = pool.begin().await?;
  sqlx::query("INSERT INTO groups (id, name, photo_url, created_at) VALUES (?, ?, ?, ?)")
    .bind(&group.id)
    .bind(&group.name)
    .bind(&group.photo_url)
    .bind(group.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;
  insert_member(&mut *tx, &group.id, creator_id, MemberRole::Admin, now).await?;
  tx.commit().await?;

  Ok(group)
}

pub async fn get_group(pool: &DbPool, group_id: &str) -> AppResult<Group> {
  sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = ?")
    .bind(group_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("group"))
}

/// The partial unique index on active memberships backstops the callers'
/// pre-checks: a concurrent duplicate join loses here instead of producing
/// a second `left_at IS NULL` row.
async fn insert_member<'e, E>(
  executor: E,
  group_id: &str,
  user_id: &str,
  role: MemberRole,
  now: DateTime<Utc>,
) -> AppResult<GroupMember>
where
  E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
  let member = GroupMember {
    id: new_id(),
    group_id: group_id.to_string(),
    user_id: user_id.to_string(),
    role,
    joined_at: now,
    left_at: None,
  };

  sqlx::query(
    "INSERT INTO group_members (id, group_id, user_id, role, joined_at, left_at)
     VALUES (?, ?, ?, ?, ?, NULL)",
  )
  .bind(&member.id)
  .bind(&member.group_id)
  .bind(&member.user_id)
  .bind(member.role)
  .bind(member.joined_at.to_rfc3339())
  .execute(executor)
  .await
  .map_err(|e| match &e {
    sqlx::Error::Database(db) if db.is_unique_violation() => {
      AppError::Validation("already a member of this group".into())
    }
    _ => AppError::Database(e),
  })?;

  Ok(member)
}

pub async fn join_group(
  pool: &DbPool,
  group_id: &str,
  user_id: &str,
  now: DateTime<Utc>,
) -> AppResult<GroupMember> {
  get_group(pool, group_id).await?;
  get_user(pool, user_id).await?;

  if active_membership(pool, group_id, user_id).await?.is_some() {
    return Err(AppError::Validation("already a member of this group".into()));
  }

  // Rejoining starts a fresh membership row; the old one keeps its left_at.
  insert_member(pool, group_id, user_id, MemberRole::Member, now).await
}

pub async fn leave_group(
  pool: &DbPool,
  group_id: &str,
  user_id: &str,
  now: DateTime<Utc>,
) -> AppResult<()> {
  let result = sqlx::query(
    "UPDATE group_members SET left_at = ?
     WHERE group_id = ? AND user_id = ? AND left_at IS NULL",
  )
  .bind(now.to_rfc3339())
  .bind(group_id)
  .bind(user_id)
  .execute(pool)
  .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound("membership"));
  }
  Ok(())
}

async fn active_membership(
  pool: &DbPool,
  group_id: &str,
  user_id: &str,
) -> AppResult<Option<GroupMember>> {
  let member = sqlx::query_as::<_, GroupMember>(
    "SELECT * FROM group_members WHERE group_id = ? AND user_id = ? AND left_at IS NULL",
  )
  .bind(group_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?;
  Ok(member)
}

pub async fn require_active_member(
  pool: &DbPool,
  group_id: &str,
  user_id: &str,
) -> AppResult<GroupMember> {
  active_membership(pool, group_id, user_id)
    .await?
    .ok_or_else(|| AppError::Forbidden("not an active member of this group".into()))
}

/// ---------------------------------------------------------------------------
/// Activities
/// ---------------------------------------------------------------------------

pub async fn create_activity(
  pool: &DbPool,
  user_id: &str,
  new_activity: NewActivity,
  now: DateTime<Utc>,
) -> AppResult<Activity> {
  new_activity.validate()?;
  get_user(pool, user_id).await?;

  let activity = Activity {
    id: new_id(),
    user_id: user_id.to_string(),
    activity_type: new_activity.activity_type,
    started_at: new_activity.started_at,
    ended_at: new_activity.ended_at,
    notes: new_activity.notes,
    created_at: now,
  };

  sqlx::query(
    "INSERT INTO activities (id, user_id, activity_type, started_at, ended_at, notes, created_at)
     VALUES (?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(&activity.id)
  .bind(&activity.user_id)
  .bind(&activity.activity_type)
  .bind(activity.started_at.to_rfc3339())
  .bind(activity.ended_at.to_rfc3339())
  .bind(&activity.notes)
  .bind(activity.created_at.to_rfc3339())
  .execute(pool)
  .await?;

  Ok(activity)
}

pub async fn recent_activities(
  pool: &DbPool,
  user_id: &str,
  limit: i64,
) -> AppResult<Vec<Activity>> {
  let activities = sqlx::query_as::<_, Activity>(
    "SELECT * FROM activities WHERE user_id = ? ORDER BY started_at DESC LIMIT ?",
  )
  .bind(user_id)
  .bind(limit)
  .fetch_all(pool)
  .await?;
  Ok(activities)
}

/// Newest activities across a whole group, bounded for the feed view.
pub const GROUP_FEED_LIMIT: i64 = 50;

/// One feed entry: an activity plus its author's display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedActivity {
  pub id: String,
  pub user_id: String,
  pub user_name: Option<String>,
  pub user_photo_url: Option<String>,
  pub activity_type: String,
  pub started_at: DateTime<Utc>,
  pub ended_at: DateTime<Utc>,
  pub notes: Option<String>,
}

/// Recent activity across all active members of a group, newest first.
/// Only active members may read the feed.
pub async fn group_feed(
  pool: &DbPool,
  group_id: &str,
  caller_id: &str,
) -> AppResult<Vec<FeedActivity>> {
  get_group(pool, group_id).await?;
  require_active_member(pool, group_id, caller_id).await?;

  let feed = sqlx::query_as::<_, FeedActivity>(
    "SELECT a.id, a.user_id, u.name AS user_name, u.photo_url AS user_photo_url,
            a.activity_type, a.started_at, a.ended_at, a.notes
     FROM activities a
     JOIN group_members gm ON gm.user_id = a.user_id
       AND gm.group_id = ? AND gm.left_at IS NULL
     JOIN users u ON u.id = a.user_id
     ORDER BY a.started_at DESC
     LIMIT ?",
  )
  .bind(group_id)
  .bind(GROUP_FEED_LIMIT)
  .fetch_all(pool)
  .await?;

  Ok(feed)
}

/// Start instants of the user's most recent activities, newest first.
/// Unparseable rows are skipped rather than failing the whole read.
async fn activity_timestamps(
  pool: &DbPool,
  user_id: &str,
  limit: i64,
) -> AppResult<Vec<DateTime<Utc>>> {
  let raw: Vec<String> = sqlx::query_scalar(
    "SELECT started_at FROM activities WHERE user_id = ? ORDER BY started_at DESC LIMIT ?",
  )
  .bind(user_id)
  .bind(limit)
  .fetch_all(pool)
  .await?;
  Ok(parse_timestamps(&raw))
}

/// ---------------------------------------------------------------------------
/// Profile stats
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
  pub total_activities: i64,
  pub last_activity_at: Option<DateTime<Utc>>,
  #[serde(flatten)]
  pub streaks: StreakResult,
}

pub async fn user_stats(
  pool: &DbPool,
  user_id: &str,
  weekly_required: Option<u32>,
  reference_now: DateTime<Utc>,
) -> AppResult<UserStats> {
  get_user(pool, user_id).await?;
  let config = StreakConfig::new(weekly_required.unwrap_or(DEFAULT_WEEKLY_REQUIRED))?;

  let total_activities: i64 =
    sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE user_id = ?")
      .bind(user_id)
      .fetch_one(pool)
      .await?;

  let timestamps = activity_timestamps(pool, user_id, STATS_ACTIVITY_LIMIT).await?;

  Ok(UserStats {
    total_activities,
    last_activity_at: timestamps.first().copied(),
    streaks: compute_streaks(&timestamps, &config, reference_now),
  })
}

/// ---------------------------------------------------------------------------
/// Group ranking
/// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct MemberRow {
  user_id: String,
  name: Option<String>,
  photo_url: Option<String>,
}

/// Standings for every active member of a group, as of `reference_now`.
///
/// The golden target comes from the request when given, otherwise from the
/// group's active season, otherwise `DEFAULT_WEEKLY_REQUIRED`.
pub async fn group_ranking(
  pool: &DbPool,
  group_id: &str,
  caller_id: &str,
  weekly_required: Option<u32>,
  reference_now: DateTime<Utc>,
) -> AppResult<Vec<MemberStanding>> {
  get_group(pool, group_id).await?;
  require_active_member(pool, group_id, caller_id).await?;

  let target = match weekly_required {
    Some(n) => n,
    None => active_season(pool, group_id, reference_now)
      .await?
      .map(|s| s.min_per_week)
      .unwrap_or(DEFAULT_WEEKLY_REQUIRED),
  };
  let config = StreakConfig::new(target)?;

  // rowid breaks joined_at ties so full streak ties rank in join order on
  // every request.
  let rows = sqlx::query_as::<_, MemberRow>(
    "SELECT gm.user_id, u.name, u.photo_url
     FROM group_members gm
     JOIN users u ON u.id = gm.user_id
     WHERE gm.group_id = ? AND gm.left_at IS NULL
     ORDER BY gm.joined_at, gm.rowid",
  )
  .bind(group_id)
  .fetch_all(pool)
  .await?;

  let mut members = Vec::with_capacity(rows.len());
  for row in rows {
    let activities = activity_timestamps(pool, &row.user_id, STATS_ACTIVITY_LIMIT).await?;
    members.push(MemberActivity {
      member_id: row.user_id,
      display_name: row.name,
      photo_url: row.photo_url,
      activities,
    });
  }

  Ok(rank_members(members, &config, reference_now))
}

/// ---------------------------------------------------------------------------
/// Seasons
/// ---------------------------------------------------------------------------

pub async fn create_season(
  pool: &DbPool,
  group_id: &str,
  caller_id: &str,
  new_season: NewSeason,
  now: DateTime<Utc>,
) -> AppResult<Season> {
  get_group(pool, group_id).await?;
  let member = require_active_member(pool, group_id, caller_id).await?;
  if member.role != MemberRole::Admin {
    return Err(AppError::Forbidden("only group admins can create seasons".into()));
  }
  new_season.validate()?;

  let season = Season {
    id: new_id(),
    group_id: group_id.to_string(),
    name: new_season.name,
    description: new_season.description,
    start_date: new_season.start_date,
    end_date: new_season.end_date,
    min_per_week: new_season.min_per_week,
    created_at: now,
  };

  sqlx::query(
    "INSERT INTO seasons (id, group_id, name, description, start_date, end_date, min_per_week, created_at)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(&season.id)
  .bind(&season.group_id)
  .bind(&season.name)
  .bind(&season.description)
  .bind(season.start_date)
  .bind(season.end_date)
  .bind(season.min_per_week)
  .bind(season.created_at.to_rfc3339())
  .execute(pool)
  .await?;

  Ok(season)
}

pub async fn season_overview(
  pool: &DbPool,
  group_id: &str,
  caller_id: &str,
  reference_now: DateTime<Utc>,
) -> AppResult<SeasonOverview> {
  get_group(pool, group_id).await?;
  require_active_member(pool, group_id, caller_id).await?;

  let seasons = sqlx::query_as::<_, Season>(
    "SELECT * FROM seasons WHERE group_id = ? ORDER BY start_date DESC",
  )
  .bind(group_id)
  .fetch_all(pool)
  .await?;

  Ok(SeasonOverview::partition(seasons, reference_now.date_naive()))
}

async fn active_season(
  pool: &DbPool,
  group_id: &str,
  reference_now: DateTime<Utc>,
) -> AppResult<Option<Season>> {
  let today = reference_now.date_naive();
  let season = sqlx::query_as::<_, Season>(
    "SELECT * FROM seasons
     WHERE group_id = ? AND start_date <= ? AND end_date >= ?
     ORDER BY start_date DESC LIMIT 1",
  )
  .bind(group_id)
  .bind(today)
  .bind(today)
  .fetch_optional(pool)
  .await?;
  Ok(season)
}

/// ---------------------------------------------------------------------------
/// Season calendar
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SeasonCalendar {
  pub season: Season,
  pub user_id: String,
  #[serde(flatten)]
  pub grid: CalendarGrid,
}

/// The calendar grid for one member over one season. `target_user` defaults
/// to the caller; both must be active members of the season's group.
pub async fn season_calendar(
  pool: &DbPool,
  season_id: &str,
  caller_id: &str,
  target_user: Option<String>,
  reference_now: DateTime<Utc>,
) -> AppResult<SeasonCalendar> {
  let season = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE id = ?")
    .bind(season_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("season"))?;

  require_active_member(pool, &season.group_id, caller_id).await?;
  let user_id = target_user.unwrap_or_else(|| caller_id.to_string());
  if user_id != caller_id {
    require_active_member(pool, &season.group_id, &user_id).await?;
  }

  let config = StreakConfig::new(season.min_per_week)?;
  let activities = season_activity_timestamps(pool, &user_id, &season).await?;
  let grid = build_calendar(
    season.start_date,
    season.end_date,
    &config,
    &activities,
    reference_now,
  );

  Ok(SeasonCalendar { season, user_id, grid })
}

/// Activities overlapping the season plus its seven context days per side.
/// RFC 3339 text in a fixed offset compares lexicographically, so a bare
/// date string works as a day boundary against full timestamps.
async fn season_activity_timestamps(
  pool: &DbPool,
  user_id: &str,
  season: &Season,
) -> AppResult<Vec<DateTime<Utc>>> {
  let from = (season.start_date - chrono::Duration::days(7)).to_string();
  let until = (season.end_date + chrono::Duration::days(8)).to_string();

  let raw: Vec<String> = sqlx::query_scalar(
    "SELECT started_at FROM activities
     WHERE user_id = ? AND started_at >= ? AND started_at < ?
     ORDER BY started_at",
  )
  .bind(user_id)
  .bind(from)
  .bind(until)
  .fetch_all(pool)
  .await?;

  Ok(parse_timestamps(&raw))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
