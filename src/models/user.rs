use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
  pub id: String,
  pub name: Option<String>,
  pub email: String,
  pub photo_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// For registering new users (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
  pub email: String,
  pub name: Option<String>,
  pub photo_url: Option<String>,
}
