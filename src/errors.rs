//! Application error type
//!
//! Every handler returns `AppResult<T>`; the error side maps onto an HTTP
//! status and a small JSON body. Database errors never leak their message
//! to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::streaks::StatsError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("missing or empty x-user-id header")]
  Unauthorized,

  #[error("{0}")]
  Forbidden(String),

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error(transparent)]
  Stats(#[from] StatsError),

  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
  fn status(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Stats(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      tracing::error!("request failed: {}", self);
      "internal server error".to_string()
    } else {
      self.to_string()
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(
      AppError::Validation("bad".into()).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      AppError::Forbidden("not a member".into()).status(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(AppError::NotFound("group").status(), StatusCode::NOT_FOUND);
    assert_eq!(
      AppError::Stats(StatsError::InvalidWeeklyTarget(0)).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      AppError::Database(sqlx::Error::PoolTimedOut).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_not_found_message_names_the_resource() {
    assert_eq!(AppError::NotFound("season").to_string(), "season not found");
  }
}
