//! Season calendar grid
//!
//! Derived presentation view over a season's date range: the range is
//! sliced into Monday-to-Sunday weeks (edge weeks stay partial, since
//! season boundaries are arbitrary calendar dates), framed by seven context
//! days on each side. Each week is classified independently from its total
//! activity count; unlike the streak engine there are no consecutive-run
//! semantics here.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;
use std::collections::HashMap;

use crate::streaks::StreakConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekKind {
  None,
  Common,
  Golden,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
  pub date: NaiveDate,
  pub workout_count: u32,
  pub is_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarWeek {
  pub kind: WeekKind,
  pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarGrid {
  /// Seven context days before the season. Rendered dimmed, never
  /// classified.
  pub leading: Vec<CalendarDay>,
  pub weeks: Vec<CalendarWeek>,
  /// Seven context days after the season.
  pub trailing: Vec<CalendarDay>,
}

/// Builds the grid for one member over one season.
///
/// An inverted range yields an empty grid rather than an error; season
/// validity is already enforced at creation, so this path only exists for
/// external callers.
pub fn build_calendar(
  season_start: NaiveDate,
  season_end: NaiveDate,
  config: &StreakConfig,
  activities: &[DateTime<Utc>],
  reference_now: DateTime<Utc>,
) -> CalendarGrid {
  if season_end < season_start {
    return CalendarGrid::default();
  }

  let today = reference_now.date_naive();
  let counts = day_counts(activities);

  // Slice the season's days on Monday boundaries; edge weeks stay short.
  let mut weeks = Vec::new();
  let mut days: Vec<CalendarDay> = Vec::new();
  let mut date = season_start;
  while date <= season_end {
    if date.weekday() == Weekday::Mon && !days.is_empty() {
      weeks.push(classify_week(days, config));
      days = Vec::new();
    }
    days.push(day_cell(date, &counts, today));
    date += Duration::days(1);
  }
  if !days.is_empty() {
    weeks.push(classify_week(days, config));
  }

  let leading = (1..=7)
    .rev()
    .map(|i| day_cell(season_start - Duration::days(i), &counts, today))
    .collect();
  let trailing = (1..=7)
    .map(|i| day_cell(season_end + Duration::days(i), &counts, today))
    .collect();

  CalendarGrid {
    leading,
    weeks,
    trailing,
  }
}

/// Counts activities per calendar day. Multiple same-day workouts are
/// preserved so the view can badge them.
fn day_counts(activities: &[DateTime<Utc>]) -> HashMap<NaiveDate, u32> {
  let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
  for ts in activities {
    *counts.entry(ts.date_naive()).or_insert(0) += 1;
  }
  counts
}

fn day_cell(date: NaiveDate, counts: &HashMap<NaiveDate, u32>, today: NaiveDate) -> CalendarDay {
  CalendarDay {
    date,
    workout_count: counts.get(&date).copied().unwrap_or(0),
    is_today: date == today,
  }
}

fn classify_week(days: Vec<CalendarDay>, config: &StreakConfig) -> CalendarWeek {
  let total: u32 = days.iter().map(|d| d.workout_count).sum();
  let kind = if total == 0 {
    WeekKind::None
  } else if total < config.weekly_required() {
    WeekKind::Common
  } else {
    WeekKind::Golden
  };
  CalendarWeek { kind, days }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
  }

  fn reference_now() -> DateTime<Utc> {
    at(2025, 3, 21, 12) // Friday inside the test seasons
  }

  fn config(required: u32) -> StreakConfig {
    StreakConfig::new(required).unwrap()
  }

  #[test]
  fn test_ten_day_season_starting_wednesday() {
    // Wed 2025-03-19 .. Fri 2025-03-28: a 5-day partial first week
    // (Wed..Sun) followed by a 5-day partial second week (Mon..Fri).
    let grid = build_calendar(
      date(2025, 3, 19),
      date(2025, 3, 28),
      &config(2),
      &[],
      reference_now(),
    );

    assert_eq!(grid.weeks.len(), 2);
    assert_eq!(grid.weeks[0].days.len(), 5);
    assert_eq!(grid.weeks[1].days.len(), 5);
    assert_eq!(grid.weeks[0].days[0].date, date(2025, 3, 19));
    assert_eq!(grid.weeks[0].days[4].date, date(2025, 3, 23));
    assert_eq!(grid.weeks[1].days[0].date, date(2025, 3, 24));
    assert_eq!(grid.weeks[1].days[4].date, date(2025, 3, 28));
  }

  #[test]
  fn test_full_weeks_are_monday_to_sunday() {
    // Mon 2025-03-03 .. Sun 2025-03-16: two complete weeks.
    let grid = build_calendar(
      date(2025, 3, 3),
      date(2025, 3, 16),
      &config(2),
      &[],
      reference_now(),
    );

    assert_eq!(grid.weeks.len(), 2);
    for week in &grid.weeks {
      assert_eq!(week.days.len(), 7);
      assert_eq!(week.days[0].date.weekday(), Weekday::Mon);
      assert_eq!(week.days[6].date.weekday(), Weekday::Sun);
    }
  }

  #[test]
  fn test_padding_is_seven_days_each_side() {
    let grid = build_calendar(
      date(2025, 3, 19),
      date(2025, 3, 28),
      &config(2),
      &[],
      reference_now(),
    );

    assert_eq!(grid.leading.len(), 7);
    assert_eq!(grid.trailing.len(), 7);
    assert_eq!(grid.leading[0].date, date(2025, 3, 12));
    assert_eq!(grid.leading[6].date, date(2025, 3, 18));
    assert_eq!(grid.trailing[0].date, date(2025, 3, 29));
    assert_eq!(grid.trailing[6].date, date(2025, 4, 4));
  }

  #[test]
  fn test_week_classification_thresholds() {
    // Target 3. Week 1: no workouts. Week 2: one workout. Week 3: three
    // workouts, two of them the same day.
    let activities = vec![
      at(2025, 3, 11, 9),
      at(2025, 3, 18, 9),
      at(2025, 3, 18, 19),
      at(2025, 3, 20, 9),
    ];
    let grid = build_calendar(
      date(2025, 3, 3),
      date(2025, 3, 23),
      &config(3),
      &activities,
      reference_now(),
    );

    assert_eq!(grid.weeks.len(), 3);
    assert_eq!(grid.weeks[0].kind, WeekKind::None);
    assert_eq!(grid.weeks[1].kind, WeekKind::Common);
    assert_eq!(grid.weeks[2].kind, WeekKind::Golden);
  }

  #[test]
  fn test_same_day_workouts_show_in_day_count() {
    let activities = vec![at(2025, 3, 18, 9), at(2025, 3, 18, 19)];
    let grid = build_calendar(
      date(2025, 3, 17),
      date(2025, 3, 23),
      &config(2),
      &activities,
      reference_now(),
    );

    let tuesday = &grid.weeks[0].days[1];
    assert_eq!(tuesday.date, date(2025, 3, 18));
    assert_eq!(tuesday.workout_count, 2);
  }

  #[test]
  fn test_is_today_flag() {
    let grid = build_calendar(
      date(2025, 3, 17),
      date(2025, 3, 23),
      &config(2),
      &[],
      reference_now(),
    );

    let flagged: Vec<NaiveDate> = grid.weeks[0]
      .days
      .iter()
      .filter(|d| d.is_today)
      .map(|d| d.date)
      .collect();
    assert_eq!(flagged, vec![date(2025, 3, 21)]);
  }

  #[test]
  fn test_padding_days_carry_counts_but_no_classification() {
    // A workout the day before the season shows its count in the leading
    // strip without affecting any week's kind.
    let activities = vec![at(2025, 3, 16, 10)];
    let grid = build_calendar(
      date(2025, 3, 17),
      date(2025, 3, 23),
      &config(1),
      &activities,
      reference_now(),
    );

    assert_eq!(grid.leading[6].date, date(2025, 3, 16));
    assert_eq!(grid.leading[6].workout_count, 1);
    assert_eq!(grid.weeks[0].kind, WeekKind::None);
  }

  #[test]
  fn test_single_day_season() {
    let grid = build_calendar(
      date(2025, 3, 19),
      date(2025, 3, 19),
      &config(2),
      &[],
      reference_now(),
    );
    assert_eq!(grid.weeks.len(), 1);
    assert_eq!(grid.weeks[0].days.len(), 1);
  }

  #[test]
  fn test_inverted_range_yields_empty_grid() {
    let grid = build_calendar(
      date(2025, 3, 28),
      date(2025, 3, 19),
      &config(2),
      &[],
      reference_now(),
    );
    assert!(grid.weeks.is_empty());
    assert!(grid.leading.is_empty());
    assert!(grid.trailing.is_empty());
  }
}
