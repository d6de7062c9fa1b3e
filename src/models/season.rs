use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Season {
  pub id: String,
  pub group_id: String,
  pub name: String,
  pub description: Option<String>,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub min_per_week: u32,
  pub created_at: DateTime<Utc>,
}

/// For creating seasons (without id, group_id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeason {
  pub name: String,
  pub description: Option<String>,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub min_per_week: u32,
}

impl NewSeason {
  pub fn validate(&self) -> Result<(), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("season name must not be empty".into()));
    }
    if self.end_date < self.start_date {
      return Err(AppError::Validation(
        "season end date must not precede its start date".into(),
      ));
    }
    if self.min_per_week == 0 {
      return Err(AppError::Validation(
        "min_per_week must be at least 1".into(),
      ));
    }
    Ok(())
  }
}

/// A group's seasons split relative to a given day. At most one season is
/// surfaced as active; should ranges ever overlap, the one with the most
/// recent start wins and the rest fall into `past`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeasonOverview {
  pub active: Option<Season>,
  pub upcoming: Option<Season>,
  pub past: Vec<Season>,
}

impl SeasonOverview {
  /// Expects `seasons` ordered by start date, most recent first.
  pub fn partition(seasons: Vec<Season>, today: NaiveDate) -> Self {
    let mut overview = Self::default();
    for season in seasons {
      if season.start_date > today {
        // Later iterations start earlier, so this ends on the soonest one.
        overview.upcoming = Some(season);
      } else if season.end_date >= today && overview.active.is_none() {
        overview.active = Some(season);
      } else {
        overview.past.push(season);
      }
    }
    overview
  }
}
