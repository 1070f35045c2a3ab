//! JSON REST API for the Counsel portal.
//!
//! Exposes an axum [`Router`] backed by any [`counsel_core::store::PortalStore`].
//! TLS, CORS, and transport concerns are the caller's responsibility.
//!
//! Every endpoint responds with the envelope
//! `{ "success": bool, "message": string, "data"?: … }`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState { store: Arc::new(store), auth: Arc::new(auth) };
//! axum::serve(listener, counsel_api::router(state)).await?;
//! ```

pub mod auth;
pub mod documents;
pub mod error;
pub mod inquiries;
pub mod session;
pub mod token;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::DefaultBodyLimit,
  http::StatusCode,
  routing::{delete, get, post, put},
};
use counsel_core::store::PortalStore;
use serde::Serialize;
use serde_json::json;

pub use auth::AuthConfig;
pub use error::ApiError;

/// Request bodies above this are rejected outright. Slightly over the 5 MiB
/// payload cap to leave room for multipart framing and the other fields.
pub const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PortalStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Session
    .route("/auth/register", post(session::register::<S>))
    .route("/auth/login", post(session::login::<S>))
    .route("/auth/logout", post(session::logout::<S>))
    // Users
    .route("/user/getAll", get(users::list::<S>))
    .route("/user/get/{id}", get(users::get_one::<S>))
    .route("/user/update/{id}", put(users::update::<S>))
    .route("/user/updateUserProfile/{id}", put(users::update_profile::<S>))
    .route("/user/delete/{id}", delete(users::delete_one::<S>))
    // Documents
    .route("/file/upload", post(documents::upload::<S>))
    .route("/file/get/{id}", get(documents::list_for_user::<S>))
    .route("/file/getAll", get(documents::list_all::<S>))
    .route("/file/update/{id}", put(documents::replace::<S>))
    .route("/file/delete/{id}", delete(documents::delete_one::<S>))
    // Inquiries
    .route("/consultation/submit", post(inquiries::submit::<S>))
    .route("/consultation/all", get(inquiries::list_all::<S>))
    .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
    .with_state(state)
}

// ─── Envelope helpers ────────────────────────────────────────────────────────

/// `200 OK` envelope with a data payload.
pub(crate) fn ok_with(
  message: &str,
  data: impl Serialize,
) -> Json<serde_json::Value> {
  Json(json!({ "success": true, "message": message, "data": data }))
}

/// `200 OK` envelope with no data payload.
pub(crate) fn ok(message: &str) -> Json<serde_json::Value> {
  Json(json!({ "success": true, "message": message }))
}

/// `201 Created` envelope with a data payload.
pub(crate) fn created_with(
  message: &str,
  data: impl Serialize,
) -> (StatusCode, Json<serde_json::Value>) {
  (
    StatusCode::CREATED,
    Json(json!({ "success": true, "message": message, "data": data })),
  )
}
