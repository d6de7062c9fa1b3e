//! Group member standings
//!
//! Runs the streak engine once per member, all against the same injected
//! instant, then orders the standings. Display fields are passthrough from
//! the store; the aggregator never computes them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::streaks::{compute_streaks, StreakConfig, StreakResult};

/// One member's activity history plus passthrough display fields.
#[derive(Debug, Clone)]
pub struct MemberActivity {
  pub member_id: String,
  pub display_name: Option<String>,
  pub photo_url: Option<String>,
  pub activities: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberStanding {
  pub member_id: String,
  pub display_name: Option<String>,
  pub photo_url: Option<String>,
  #[serde(flatten)]
  pub streaks: StreakResult,
}

/// Ranks every member as of the same instant: golden streak descending,
/// then common streak descending. Remaining ties keep input order, which
/// the stable sort guarantees.
pub fn rank_members(
  members: Vec<MemberActivity>,
  config: &StreakConfig,
  reference_now: DateTime<Utc>,
) -> Vec<MemberStanding> {
  let mut standings: Vec<MemberStanding> = members
    .into_iter()
    .map(|member| MemberStanding {
      streaks: compute_streaks(&member.activities, config, reference_now),
      member_id: member.member_id,
      display_name: member.display_name,
      photo_url: member.photo_url,
    })
    .collect();

  standings.sort_by(|a, b| {
    b.streaks
      .golden_streak
      .cmp(&a.streaks.golden_streak)
      .then(b.streaks.common_streak.cmp(&a.streaks.common_streak))
  });

  standings
}
