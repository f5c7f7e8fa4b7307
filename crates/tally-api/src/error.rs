//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::flash::Flash;

/// Shown in place of any persistence failure.
pub const STORE_FAILURE: &str = "operation failed, state unchanged";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<tally_core::Error> for ApiError {
  fn from(err: tally_core::Error) -> Self {
    use tally_core::Error as E;
    match err {
      E::InvalidInput(m) => ApiError::BadRequest(m),
      E::UserNotFound(_) => ApiError::NotFound("user not found".to_string()),
      E::DeadlineNotFound(_) => {
        ApiError::NotFound("Deadline not found!".to_string())
      }
      E::EmailTaken(_) => ApiError::Conflict(
        "Email already registered. Please log in.".to_string(),
      ),
      E::Store(e) => ApiError::Store(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, flash) = match &self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, m.clone(), Flash::danger(m.clone()))
      }
      ApiError::BadRequest(m) => {
        tracing::warn!(reason = %m, "rejected input");
        (StatusCode::BAD_REQUEST, m.clone(), Flash::danger(m.clone()))
      }
      ApiError::Conflict(m) => {
        (StatusCode::CONFLICT, m.clone(), Flash::warning(m.clone()))
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          STORE_FAILURE.to_string(),
          Flash::danger(STORE_FAILURE),
        )
      }
    };
    (status, Json(json!({ "error": message, "flashes": [flash] })))
      .into_response()
  }
}
