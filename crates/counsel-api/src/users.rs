//! Handlers for the `/user` endpoints.
//!
//! Listing, full update, and deletion are administrator-only. Any session
//! may fetch a single user; the profile route is restricted to the account
//! owner (or an administrator).

use axum::{
  Json,
  extract::{Path, State},
};
use counsel_core::{
  store::PortalStore,
  user::{ProfileUpdate, UserUpdate},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{self, Admin, Identity},
  error::ApiError,
  ok, ok_with, session,
};

// ─── Validation helpers ──────────────────────────────────────────────────────

/// Loose shape check: `local@domain.tld`, no whitespace.
pub(crate) fn is_valid_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
}

/// Contact numbers are exactly ten digits.
pub(crate) fn is_valid_contact(contact: &str) -> bool {
  contact.len() == 10 && contact.chars().all(|c| c.is_ascii_digit())
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw)
    .map_err(|_| ApiError::Validation(format!("Invalid {what} ID format")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /user/getAll` — an empty result is a valid, non-error response.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Admin(_): Admin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let users = state
    .store
    .list_users()
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok_with("All users retrieved successfully", users))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /user/get/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
  Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let id = parse_id(&id, "user")?;
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
  Ok(ok_with("User retrieved successfully", user))
}

// ─── Full update (admin) ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub contact: String,
  #[serde(rename = "type", default)]
  pub area:    String,
}

/// `PUT /user/update/:id` — full-record update; never touches the password
/// or the role flag.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Admin(_): Admin,
  Path(id): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let id = parse_id(&id, "user")?;

  if body.name.is_empty()
    || body.email.is_empty()
    || body.contact.is_empty()
    || body.area.is_empty()
  {
    return Err(ApiError::Validation("All fields are required".into()));
  }
  if !is_valid_email(&body.email) {
    return Err(ApiError::Validation("Invalid email format".into()));
  }
  if !is_valid_contact(&body.contact) {
    return Err(ApiError::Validation(
      "Contact number must be 10 digits".into(),
    ));
  }

  let practice_area = session::parse_practice_area(Some(&body.area))?;

  let user = state
    .store
    .update_user(
      id,
      UserUpdate {
        name: body.name,
        email: body.email,
        contact: body.contact,
        practice_area,
      },
    )
    .await
    .map_err(ApiError::from_store)?;

  Ok(ok_with("Client updated successfully", user))
}

// ─── Profile update (self-service) ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
  #[serde(default)]
  pub name:             String,
  #[serde(default)]
  pub email:            String,
  #[serde(default)]
  pub contact:          String,
  pub current_password: Option<String>,
  pub new_password:     Option<String>,
}

/// `PUT /user/updateUserProfile/:id` — restricted to the account owner (or
/// an admin). Changing the password requires verifying the current one;
/// role and practice area are admin-controlled and not accepted here.
pub async fn update_profile<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<String>,
  Json(body): Json<ProfileBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let id = parse_id(&id, "user")?;

  if !identity.may_act_for(id) {
    return Err(ApiError::Forbidden(
      "You may only edit your own profile".into(),
    ));
  }

  if body.name.is_empty() || body.email.is_empty() || body.contact.is_empty() {
    return Err(ApiError::Validation(
      "Name, email, and contact are required fields".into(),
    ));
  }
  if !is_valid_email(&body.email) {
    return Err(ApiError::Validation("Invalid email format".into()));
  }
  if !is_valid_contact(&body.contact) {
    return Err(ApiError::Validation(
      "Contact number must be 10 digits".into(),
    ));
  }

  let new_password_hash = match body.new_password.as_deref() {
    None | Some("") => None,
    Some(new_password) => {
      let current = body.current_password.as_deref().unwrap_or("");
      if current.is_empty() {
        return Err(ApiError::Validation(
          "Current password is required to change password".into(),
        ));
      }

      let creds = state
        .store
        .get_user_credentials(id)
        .await
        .map_err(ApiError::from_store)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

      if !auth::verify_password(current, &creds.password_hash) {
        return Err(ApiError::Unauthorized(
          "Current password is incorrect".into(),
        ));
      }

      Some(auth::hash_password(new_password)?)
    }
  };

  let user = state
    .store
    .update_profile(
      id,
      ProfileUpdate {
        name: body.name,
        email: body.email,
        contact: body.contact,
        new_password_hash,
      },
    )
    .await
    .map_err(ApiError::from_store)?;

  Ok(ok_with("Profile updated successfully", user))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /user/delete/:id` — hard delete; the user's documents go with
/// them in the same transaction.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Admin(_): Admin,
  Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let id = parse_id(&id, "user")?;
  state
    .store
    .delete_user(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok("User deleted successfully"))
}
