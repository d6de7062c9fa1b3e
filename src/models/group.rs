use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
  pub id: String,
  pub name: String,
  pub photo_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
  pub name: String,
  pub photo_url: Option<String>,
}

/// Stored lowercase in `group_members.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
  Admin,
  Member,
}

/// A membership row. `left_at` set means the user left the group; the row
/// is kept so their past activity stays attributable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupMember {
  pub id: String,
  pub group_id: String,
  pub user_id: String,
  pub role: MemberRole,
  pub joined_at: DateTime<Utc>,
  pub left_at: Option<DateTime<Utc>>,
}
