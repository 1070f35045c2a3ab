//! Handlers for the `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | 409 on duplicate email; practice area defaults to Others |
//! | `POST` | `/auth/login` | sets the session cookie on success |
//! | `POST` | `/auth/logout` | clears the cookie; no server-side state |

use axum::{Json, extract::State, http::header, response::IntoResponse};
use chrono::Utc;
use counsel_core::{
  store::{PortalStore, StoreError, StoreErrorKind},
  user::{NewUser, PracticeArea},
};
use serde::Deserialize;

use crate::{
  AppState, auth, created_with, error::ApiError, ok, ok_with, token,
};

fn allowed_practice_areas() -> String {
  PracticeArea::ALL
    .iter()
    .map(|a| a.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Parse the optional `type` field, defaulting to Others when absent.
pub(crate) fn parse_practice_area(
  raw: Option<&str>,
) -> Result<PracticeArea, ApiError> {
  match raw {
    None | Some("") => Ok(PracticeArea::default()),
    Some(s) => s.parse().map_err(|_| {
      ApiError::Validation(format!(
        "Invalid practice area. Allowed values: {}",
        allowed_practice_areas()
      ))
    }),
  }
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub name:     String,
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
  #[serde(default)]
  pub contact:  String,
  /// Practice-area classification; admin-assigned, defaults to Others.
  #[serde(rename = "type")]
  pub area:     Option<String>,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  if body.name.is_empty()
    || body.email.is_empty()
    || body.password.is_empty()
    || body.contact.is_empty()
  {
    return Err(ApiError::Validation(
      "Name, email, password, and contact are required fields".into(),
    ));
  }

  let practice_area = parse_practice_area(body.area.as_deref())?;
  let password_hash = auth::hash_password(&body.password)?;

  let user = state
    .store
    .create_user(NewUser {
      name: body.name,
      email: body.email,
      password_hash,
      contact: body.contact,
      // No self-promotion path: accounts are always created as clients.
      is_admin: false,
      practice_area,
    })
    .await
    .map_err(|e| {
      if e.kind() == StoreErrorKind::EmailTaken {
        ApiError::Conflict("Email is already registered".into())
      } else {
        ApiError::from_store(e)
      }
    })?;

  Ok(created_with("User registered successfully", user))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  if body.email.is_empty() || body.password.is_empty() {
    return Err(ApiError::Validation("All fields are required".into()));
  }

  let creds = state
    .store
    .find_credentials_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

  if !auth::verify_password(&body.password, &creds.password_hash) {
    return Err(ApiError::Unauthorized("Incorrect password".into()));
  }

  let claims =
    token::Claims::issue(creds.user.user_id, creds.user.is_admin, Utc::now());
  let signed = token::sign(&claims, state.auth.token_secret.as_bytes())
    .map_err(|e| ApiError::Internal(format!("token signing: {e}")))?;

  Ok((
    [(header::SET_COOKIE, state.auth.session_cookie(&signed))],
    ok_with("Login successful", creds.user),
  ))
}

// ─── Logout ───────────────────────────────────────────────────────────────────

/// `POST /auth/logout` — instructs the browser to discard the cookie.
/// Tokens are stateless, so there is nothing to revoke server-side.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  Ok((
    [(header::SET_COOKIE, state.auth.clear_cookie())],
    ok("User has been signed out"),
  ))
}
