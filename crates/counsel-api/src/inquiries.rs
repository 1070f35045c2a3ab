//! Handlers for the `/consultation` endpoints.
//!
//! Submission is public (no session required); reading the inbox is
//! administrator-only.

use axum::{Json, extract::State, response::IntoResponse};
use counsel_core::{inquiry::NewInquiry, store::PortalStore};
use serde::Deserialize;

use crate::{AppState, auth::Admin, created_with, error::ApiError, ok_with};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
  #[serde(default)]
  pub first_name:        String,
  #[serde(default)]
  pub last_name:         String,
  #[serde(default)]
  pub email:             String,
  #[serde(default)]
  pub phone:             String,
  #[serde(default)]
  pub legal_matter_type: String,
  #[serde(default)]
  pub message:           String,
}

/// `POST /consultation/submit` — anonymous; all six fields required.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  if body.first_name.is_empty()
    || body.last_name.is_empty()
    || body.email.is_empty()
    || body.phone.is_empty()
    || body.legal_matter_type.is_empty()
    || body.message.is_empty()
  {
    return Err(ApiError::Validation("All fields are required".into()));
  }

  let inquiry = state
    .store
    .add_inquiry(NewInquiry {
      first_name:  body.first_name,
      last_name:   body.last_name,
      email:       body.email,
      phone:       body.phone,
      matter_type: body.legal_matter_type,
      message:     body.message,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok(created_with(
    "Consultation request submitted successfully",
    inquiry,
  ))
}

/// `GET /consultation/all` — newest first; staff only.
pub async fn list_all<S>(
  State(state): State<AppState<S>>,
  Admin(_): Admin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let inquiries = state
    .store
    .list_inquiries()
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok_with("Consultation requests retrieved successfully", inquiries))
}
