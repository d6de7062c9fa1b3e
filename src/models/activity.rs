use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
  pub id: String,
  pub user_id: String,
  pub activity_type: String,
  pub started_at: DateTime<Utc>,
  pub ended_at: DateTime<Utc>,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}

fn default_activity_type() -> String {
  "gym".to_string()
}

/// For logging new activities (without id, user_id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
  #[serde(default = "default_activity_type")]
  pub activity_type: String,
  pub started_at: DateTime<Utc>,
  pub ended_at: DateTime<Utc>,
  pub notes: Option<String>,
}

impl NewActivity {
  pub fn validate(&self) -> Result<(), AppError> {
    if self.ended_at <= self.started_at {
      return Err(AppError::Validation(
        "activity must end after it starts".into(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_new_activity_must_end_after_start() {
    let start = Utc.with_ymd_and_hms(2025, 3, 19, 18, 0, 0).unwrap();
    let activity = NewActivity {
      activity_type: "gym".to_string(),
      started_at: start,
      ended_at: start + chrono::Duration::hours(1),
      notes: None,
    };
    assert!(activity.validate().is_ok());

    let zero_length = NewActivity { ended_at: start, ..activity.clone() };
    assert!(zero_length.validate().is_err());

    let backwards = NewActivity {
      ended_at: start - chrono::Duration::minutes(30),
      ..activity
    };
    assert!(backwards.validate().is_err());
  }

  #[test]
  fn test_activity_type_defaults_to_gym() {
    let json = r#"{"started_at":"2025-03-19T18:00:00Z","ended_at":"2025-03-19T19:00:00Z"}"#;
    let activity: NewActivity = serde_json::from_str(json).unwrap();
    assert_eq!(activity.activity_type, "gym");
    assert!(activity.notes.is_none());
  }
}
