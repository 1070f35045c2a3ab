//! Cookie-based session auth: password hashing, the `token` cookie, and the
//! [`Identity`] / [`Admin`] request extractors.
//!
//! The server trusts the role claim embedded in the token; it does not
//! re-fetch the user record per request. A role change therefore takes
//! effect at the user's next login, not before.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use chrono::Utc;
use counsel_core::store::PortalStore;
use rand_core::OsRng;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, token};

/// Name of the session cookie.
pub const COOKIE_NAME: &str = "token";

// ─── Configuration ───────────────────────────────────────────────────────────

/// `SameSite` attribute for the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
  Strict,
  Lax,
  None,
}

impl SameSite {
  fn as_str(self) -> &'static str {
    match self {
      SameSite::Strict => "Strict",
      SameSite::Lax => "Lax",
      SameSite::None => "None",
    }
  }
}

/// Session signing and cookie policy for this server instance.
///
/// The defaults reproduce the original deployment's cross-site-sendable
/// cookie (`SameSite=None; Secure`). That configuration weakens CSRF
/// resistance; deployments that serve the client from the same origin
/// should set `cookie_same_site` to `lax` or `strict`.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
  /// Secret for HMAC token signing. Externally supplied, never hard-coded.
  pub token_secret:     String,
  #[serde(default = "default_cookie_secure")]
  pub cookie_secure:    bool,
  #[serde(default = "default_same_site")]
  pub cookie_same_site: SameSite,
}

fn default_cookie_secure() -> bool { true }
fn default_same_site() -> SameSite { SameSite::None }

impl AuthConfig {
  /// `Set-Cookie` value carrying a freshly-issued session token.
  pub fn session_cookie(&self, token: &str) -> String {
    format!(
      "{COOKIE_NAME}={token}; Path=/; Max-Age={}; HttpOnly; SameSite={}{}",
      token::TOKEN_TTL_SECS,
      self.cookie_same_site.as_str(),
      self.secure_suffix(),
    )
  }

  /// `Set-Cookie` value instructing the browser to discard the session.
  pub fn clear_cookie(&self) -> String {
    format!(
      "{COOKIE_NAME}=; Path=/; Max-Age=0; HttpOnly; SameSite={}{}",
      self.cookie_same_site.as_str(),
      self.secure_suffix(),
    )
  }

  // Browsers refuse SameSite=None without Secure.
  fn secure_suffix(&self) -> &'static str {
    if self.cookie_secure || self.cookie_same_site == SameSite::None {
      "; Secure"
    } else {
      ""
    }
  }
}

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plain.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(plain: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(plain.as_bytes(), &parsed)
    .is_ok()
}

// ─── Cookie parsing ──────────────────────────────────────────────────────────

/// Extract the raw session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .flat_map(|line| line.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == COOKIE_NAME)
    .map(|(_, value)| value)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The authenticated caller, decoded from the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
  pub user_id: Uuid,
  pub admin:   bool,
}

impl Identity {
  /// Whether this caller may act on `user_id`'s records: the user
  /// themselves, or any administrator.
  pub fn may_act_for(&self, user_id: Uuid) -> bool {
    self.admin || self.user_id == user_id
  }
}

/// Verify the cookie directly from headers — used by handlers and tests that
/// sit outside axum's extractor machinery.
pub fn verify_session(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Identity, ApiError> {
  let raw = session_token(headers).ok_or_else(|| {
    ApiError::Unauthorized("Unauthorized: No token provided".into())
  })?;

  let claims =
    token::verify(raw, config.token_secret.as_bytes(), Utc::now()).map_err(
      |_| ApiError::Unauthorized("Invalid or expired token".into()),
    )?;

  Ok(Identity { user_id: claims.sub, admin: claims.admin })
}

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_session(&parts.headers, &state.auth)
  }
}

/// Marker extractor for administrator-only routes.
pub struct Admin(pub Identity);

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = verify_session(&parts.headers, &state.auth)?;
    if !identity.admin {
      return Err(ApiError::Forbidden("Admin access required".into()));
    }
    Ok(Admin(identity))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn config() -> AuthConfig {
    AuthConfig {
      token_secret:     "unit-test-secret".into(),
      cookie_secure:    true,
      cookie_same_site: SameSite::None,
    }
  }

  fn headers_with_cookie(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, value.parse().unwrap());
    headers
  }

  fn issue(config: &AuthConfig, admin: bool) -> String {
    let claims = token::Claims::issue(Uuid::new_v4(), admin, Utc::now());
    token::sign(&claims, config.token_secret.as_bytes()).unwrap()
  }

  #[test]
  fn valid_cookie_yields_identity() {
    let cfg = config();
    let tok = issue(&cfg, true);
    let headers = headers_with_cookie(&format!("token={tok}"));

    let identity = verify_session(&headers, &cfg).unwrap();
    assert!(identity.admin);
  }

  #[test]
  fn token_found_among_other_cookies() {
    let cfg = config();
    let tok = issue(&cfg, false);
    let headers =
      headers_with_cookie(&format!("theme=dark; token={tok}; lang=en"));

    assert!(verify_session(&headers, &cfg).is_ok());
  }

  #[test]
  fn missing_cookie_is_unauthorized() {
    let cfg = config();
    let err = verify_session(&HeaderMap::new(), &cfg).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn expired_token_is_unauthorized() {
    let cfg = config();
    let past = Utc::now() - Duration::seconds(token::TOKEN_TTL_SECS + 60);
    let claims = token::Claims::issue(Uuid::new_v4(), false, past);
    let tok = token::sign(&claims, cfg.token_secret.as_bytes()).unwrap();
    let headers = headers_with_cookie(&format!("token={tok}"));

    let err = verify_session(&headers, &cfg).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn garbage_token_is_unauthorized() {
    let cfg = config();
    let headers = headers_with_cookie("token=not-a-real-token");
    let err = verify_session(&headers, &cfg).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn session_cookie_attributes() {
    let cfg = config();
    let cookie = cfg.session_cookie("abc");
    assert!(cookie.starts_with("token=abc;"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Secure"));
  }

  #[test]
  fn clear_cookie_expires_immediately() {
    let cfg = config();
    let cookie = cfg.clear_cookie();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
  }

  #[test]
  fn lax_without_secure_flag_omits_secure() {
    let cfg = AuthConfig {
      token_secret:     "s".into(),
      cookie_secure:    false,
      cookie_same_site: SameSite::Lax,
    };
    let cookie = cfg.session_cookie("abc");
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));
  }
}
