//! Monday-aligned calendar week primitives
//!
//! Every piece of streak and calendar logic in this crate keys weeks by
//! their Monday date. ISO week-of-year numbering is deliberately not used:
//! it reassigns the last days of December to week 1 of the next ISO year,
//! which made week keys from different views disagree at year boundaries.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Returns the Monday on or before `date`, at day granularity.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Identifies one Monday-to-Sunday window by its Monday date.
///
/// Two dates map to the same key iff they fall in the same window.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
  /// The week containing `date`.
  pub fn of(date: NaiveDate) -> Self {
    Self(monday_of(date))
  }

  /// Monday of this week.
  pub fn monday(self) -> NaiveDate {
    self.0
  }

  /// The week immediately before this one.
  pub fn prev(self) -> Self {
    Self(self.0 - Duration::days(7))
  }

  /// First day after this week (the next Monday).
  pub fn end_exclusive(self) -> NaiveDate {
    self.0 + Duration::days(7)
  }

  /// True if `date` falls inside this window.
  pub fn contains(self, date: NaiveDate) -> bool {
    date >= self.0 && date < self.end_exclusive()
  }
}

impl std::fmt::Display for WeekKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0.format("%Y-%m-%d"))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
