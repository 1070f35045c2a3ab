//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Taxonomy per failure class: 400 validation, 401 unauthenticated, 403
//! forbidden, 404 missing resource, 409 duplicate email, 500 unexpected.
//! Failures render the same envelope as successes, with `success: false`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use counsel_core::store::{StoreError, StoreErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  /// Non-store internal failure (e.g. password hashing).
  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend failure onto the taxonomy via its [`StoreErrorKind`].
  pub fn from_store<E>(e: E) -> ApiError
  where
    E: std::error::Error + StoreError + Send + Sync + 'static,
  {
    match e.kind() {
      StoreErrorKind::UserNotFound => {
        ApiError::NotFound("User not found".into())
      }
      StoreErrorKind::DocumentNotFound => {
        ApiError::NotFound("File not found".into())
      }
      StoreErrorKind::EmailTaken => {
        ApiError::Conflict("Email is already in use".into())
      }
      StoreErrorKind::Other => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Internal(m) => {
        tracing::error!(error = %m, "internal failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".to_string(),
        )
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "unexpected store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".to_string(),
        )
      }
    };
    (status, Json(json!({ "success": false, "message": message })))
      .into_response()
  }
}
