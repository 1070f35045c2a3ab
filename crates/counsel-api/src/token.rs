//! Signed session token: HMAC-SHA256 over a JSON claim set.
//!
//! Wire format is `v1.<payload>.<signature>`, both parts base64url without
//! padding. The signature covers the version prefix and the payload, so a
//! token cannot be replayed under a future format version. Tokens are
//! stateless — expiry is the only termination besides the client discarding
//! its cookie.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Sessions live for 24 hours from issue.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const TOKEN_VERSION: &str = "v1";
const MAX_TOKEN_LEN: usize = 1024;

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The claim set embedded in every session token.
///
/// The role flag is trusted as-is on later requests; a role change only
/// takes effect once the user logs in again and a fresh token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Subject — the authenticated user's id.
  pub sub:   Uuid,
  /// Role flag captured at login time.
  pub admin: bool,
  /// Issued-at, Unix seconds.
  pub iat:   i64,
  /// Expiry, Unix seconds.
  pub exp:   i64,
}

impl Claims {
  /// Claims for `user_id` issued at `now`, expiring [`TOKEN_TTL_SECS`] later.
  pub fn issue(user_id: Uuid, admin: bool, now: DateTime<Utc>) -> Self {
    Claims {
      sub:   user_id,
      admin,
      iat:   now.timestamp(),
      exp:   now.timestamp() + TOKEN_TTL_SECS,
    }
  }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.exp, 0)
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
  #[error("malformed token")]
  Malformed,

  #[error("unsupported token version")]
  UnsupportedVersion,

  #[error("invalid signature")]
  BadSignature,

  #[error("token expired")]
  Expired,

  #[error("signing failure")]
  Signing,
}

// ─── Sign / verify ───────────────────────────────────────────────────────────

fn mac_over(version: &str, payload: &str, secret: &[u8]) -> Result<HmacSha256, TokenError> {
  let mut mac =
    HmacSha256::new_from_slice(secret).map_err(|_| TokenError::Signing)?;
  mac.update(version.as_bytes());
  mac.update(b".");
  mac.update(payload.as_bytes());
  Ok(mac)
}

/// Serialize and sign `claims` into a token string.
pub fn sign(claims: &Claims, secret: &[u8]) -> Result<String, TokenError> {
  let json = serde_json::to_vec(claims).map_err(|_| TokenError::Signing)?;
  let payload = URL_SAFE_NO_PAD.encode(json);

  let mac = mac_over(TOKEN_VERSION, &payload, secret)?;
  let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

  Ok(format!("{TOKEN_VERSION}.{payload}.{sig}"))
}

/// Verify a token string against `secret` and check expiry as of `now`.
///
/// Signature comparison is constant-time via [`Mac::verify_slice`].
pub fn verify(
  token: &str,
  secret: &[u8],
  now: DateTime<Utc>,
) -> Result<Claims, TokenError> {
  if token.is_empty() || token.len() > MAX_TOKEN_LEN {
    return Err(TokenError::Malformed);
  }

  let mut parts = token.splitn(3, '.');
  let version = parts.next().ok_or(TokenError::Malformed)?;
  let payload = parts.next().ok_or(TokenError::Malformed)?;
  let sig = parts.next().ok_or(TokenError::Malformed)?;

  if version != TOKEN_VERSION {
    return Err(TokenError::UnsupportedVersion);
  }

  let sig_bytes = URL_SAFE_NO_PAD
    .decode(sig.as_bytes())
    .map_err(|_| TokenError::Malformed)?;

  let mac = mac_over(version, payload, secret)?;
  mac
    .verify_slice(&sig_bytes)
    .map_err(|_| TokenError::BadSignature)?;

  let json = URL_SAFE_NO_PAD
    .decode(payload.as_bytes())
    .map_err(|_| TokenError::Malformed)?;
  let claims: Claims =
    serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

  if claims.exp <= now.timestamp() {
    return Err(TokenError::Expired);
  }

  Ok(claims)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  const SECRET: &[u8] = b"test-signing-secret";

  fn claims_now() -> (Claims, DateTime<Utc>) {
    let now = Utc::now();
    (Claims::issue(Uuid::new_v4(), true, now), now)
  }

  #[test]
  fn sign_then_verify_round_trips() {
    let (claims, now) = claims_now();
    let token = sign(&claims, SECRET).unwrap();
    let back = verify(&token, SECRET, now).unwrap();
    assert_eq!(back, claims);
  }

  #[test]
  fn expired_token_is_rejected() {
    let (claims, now) = claims_now();
    let token = sign(&claims, SECRET).unwrap();
    let later = now + Duration::seconds(TOKEN_TTL_SECS + 1);
    assert_eq!(verify(&token, SECRET, later), Err(TokenError::Expired));
  }

  #[test]
  fn token_valid_until_the_last_second() {
    let (claims, now) = claims_now();
    let token = sign(&claims, SECRET).unwrap();
    let almost = now + Duration::seconds(TOKEN_TTL_SECS - 1);
    assert!(verify(&token, SECRET, almost).is_ok());
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let (claims, now) = claims_now();
    let token = sign(&claims, SECRET).unwrap();
    assert_eq!(
      verify(&token, b"other-secret", now),
      Err(TokenError::BadSignature)
    );
  }

  #[test]
  fn tampered_payload_is_rejected() {
    let (claims, now) = claims_now();
    let token = sign(&claims, SECRET).unwrap();

    // Flip a character inside the payload section.
    let mut parts: Vec<String> =
      token.splitn(3, '.').map(str::to_owned).collect();
    let mut payload = parts[1].clone();
    let flipped = if payload.starts_with('A') { "B" } else { "A" };
    payload.replace_range(0..1, flipped);
    parts[1] = payload;
    let tampered = parts.join(".");

    assert_eq!(
      verify(&tampered, SECRET, now),
      Err(TokenError::BadSignature)
    );
  }

  #[test]
  fn garbage_is_malformed() {
    let now = Utc::now();
    assert_eq!(verify("", SECRET, now), Err(TokenError::Malformed));
    assert_eq!(
      verify("not-a-token", SECRET, now),
      Err(TokenError::Malformed)
    );
    assert_eq!(
      verify(&"x".repeat(MAX_TOKEN_LEN + 1), SECRET, now),
      Err(TokenError::Malformed)
    );
  }

  #[test]
  fn future_version_is_rejected() {
    let (claims, now) = claims_now();
    let token = sign(&claims, SECRET).unwrap();
    let bumped = token.replacen("v1.", "v2.", 1);
    assert_eq!(
      verify(&bumped, SECRET, now),
      Err(TokenError::UnsupportedVersion)
    );
  }
}
