//! Weekly streak engine
//!
//! Buckets a user's activity timestamps into Monday-aligned weeks and scans
//! backward from the week containing `reference_now`:
//!
//! - common streak: consecutive weeks with at least one workout
//! - golden streak: consecutive weeks meeting the weekly target
//! - current week count: workouts logged so far this week
//!
//! The week in progress gets special treatment: it can still reach the
//! target before Sunday ends, so an incomplete current week must not
//! retroactively break a streak. That behavior is an explicit policy
//! ([`CurrentWeekPolicy`]) rather than an accident of the call site.
//!
//! The engine is pure: `reference_now` is injected, never read from the
//! system clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

use crate::week::WeekKey;

/// How far back the consecutive-week scan searches, unless overridden.
/// Two years comfortably covers realistic histories.
pub const DEFAULT_LOOKBACK_WEEKS: u32 = 104;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
  #[error("weekly target must be at least 1, got {0}")]
  InvalidWeeklyTarget(u32),
}

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

/// Treatment of the still-open current week during a streak scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentWeekPolicy {
  /// The in-progress week never terminates a scan; it contributes once its
  /// count meets the threshold. This is the unified contract.
  #[default]
  Forgiving,
  /// The in-progress week is judged like any closed week.
  Strict,
}

/// Validated parameters for one streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakConfig {
  weekly_required: u32,
  lookback_weeks: u32,
  policy: CurrentWeekPolicy,
}

impl StreakConfig {
  /// Rejects a zero target: "any nonzero count is golden" is never what a
  /// caller means, and seasons validate their target at creation.
  pub fn new(weekly_required: u32) -> Result<Self, StatsError> {
    if weekly_required == 0 {
      return Err(StatsError::InvalidWeeklyTarget(weekly_required));
    }
    Ok(Self {
      weekly_required,
      lookback_weeks: DEFAULT_LOOKBACK_WEEKS,
      policy: CurrentWeekPolicy::default(),
    })
  }

  pub fn with_lookback_weeks(mut self, weeks: u32) -> Self {
    self.lookback_weeks = weeks;
    self
  }

  pub fn with_policy(mut self, policy: CurrentWeekPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn weekly_required(&self) -> u32 {
    self.weekly_required
  }
}

/// ---------------------------------------------------------------------------
/// Results
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakResult {
  /// Consecutive weeks with at least one workout, counting back from the
  /// current week.
  pub common_streak: u32,
  /// Consecutive weeks meeting the weekly target.
  pub golden_streak: u32,
  /// Workouts logged in the week containing `reference_now`.
  pub current_week_count: u32,
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

/// Counts activities per Monday-aligned week.
pub fn week_counts(activities: &[DateTime<Utc>]) -> HashMap<WeekKey, u32> {
  let mut counts: HashMap<WeekKey, u32> = HashMap::new();
  for ts in activities {
    *counts.entry(WeekKey::of(ts.date_naive())).or_insert(0) += 1;
  }
  counts
}

/// Computes both streaks and the current-week count for one history.
pub fn compute_streaks(
  activities: &[DateTime<Utc>],
  config: &StreakConfig,
  reference_now: DateTime<Utc>,
) -> StreakResult {
  let counts = week_counts(activities);
  let current_week = WeekKey::of(reference_now.date_naive());

  StreakResult {
    common_streak: scan(&counts, current_week, 1, config),
    golden_streak: scan(&counts, current_week, config.weekly_required, config),
    current_week_count: counts.get(&current_week).copied().unwrap_or(0),
  }
}

/// Walks backward week by week, counting consecutive weeks at or above
/// `threshold`. Week 0 is the current week; under the forgiving policy it
/// never terminates the walk, it just contributes nothing until its count
/// reaches the threshold.
fn scan(
  counts: &HashMap<WeekKey, u32>,
  current_week: WeekKey,
  threshold: u32,
  config: &StreakConfig,
) -> u32 {
  let mut streak = 0;
  let mut week = current_week;

  for weeks_back in 0..config.lookback_weeks {
    let count = counts.get(&week).copied().unwrap_or(0);
    if count >= threshold {
      streak += 1;
    } else if weeks_back > 0 || config.policy == CurrentWeekPolicy::Strict {
      break;
    }
    week = week.prev();
  }

  streak
}

/// ---------------------------------------------------------------------------
/// Boundary parsing
/// ---------------------------------------------------------------------------

/// Parses raw RFC 3339 timestamp strings, skipping entries that fail to
/// parse. Externally-sourced rows must never abort a stats computation.
pub fn parse_timestamps<S: AsRef<str>>(raw: &[S]) -> Vec<DateTime<Utc>> {
  let mut parsed = Vec::with_capacity(raw.len());
  for value in raw {
    match DateTime::parse_from_rfc3339(value.as_ref()) {
      Ok(ts) => parsed.push(ts.with_timezone(&Utc)),
      Err(e) => warn!(
        value = value.as_ref(),
        error = %e,
        "skipping malformed activity timestamp"
      ),
    }
  }
  parsed
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
