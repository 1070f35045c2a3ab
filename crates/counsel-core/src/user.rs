//! User — a portal account, either a staff administrator or a client.
//!
//! The password hash is never carried on [`User`] itself; operations that
//! need it (login, password change) go through [`UserCredentials`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Practice area ───────────────────────────────────────────────────────────

/// Fixed classification of the legal matter a client is engaged for.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum PracticeArea {
  #[serde(rename = "Corporate Law")]
  Corporate,
  #[serde(rename = "Criminal Defense")]
  CriminalDefense,
  #[serde(rename = "Family Law")]
  Family,
  #[serde(rename = "Personal Injury")]
  PersonalInjury,
  #[serde(rename = "Estate Planning")]
  EstatePlanning,
  #[serde(rename = "Real Estate Law")]
  RealEstate,
  #[default]
  Others,
}

impl PracticeArea {
  /// Every valid practice area, in display order.
  pub const ALL: [PracticeArea; 7] = [
    PracticeArea::Corporate,
    PracticeArea::CriminalDefense,
    PracticeArea::Family,
    PracticeArea::PersonalInjury,
    PracticeArea::EstatePlanning,
    PracticeArea::RealEstate,
    PracticeArea::Others,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      PracticeArea::Corporate => "Corporate Law",
      PracticeArea::CriminalDefense => "Criminal Defense",
      PracticeArea::Family => "Family Law",
      PracticeArea::PersonalInjury => "Personal Injury",
      PracticeArea::EstatePlanning => "Estate Planning",
      PracticeArea::RealEstate => "Real Estate Law",
      PracticeArea::Others => "Others",
    }
  }
}

impl std::fmt::Display for PracticeArea {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for PracticeArea {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|area| area.as_str() == s)
      .ok_or_else(|| Error::UnknownPracticeArea(s.to_owned()))
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A portal account as exposed to API consumers. Carries no secret material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub name:          String,
  /// Unique across all users; the lookup key for login.
  pub email:         String,
  pub contact:       String,
  /// Set at creation only. There is no self-promotion path.
  pub is_admin:      bool,
  pub practice_area: PracticeArea,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// A user together with their argon2 PHC password hash.
///
/// Deliberately not `Serialize` — the hash must never leave the server.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

// ─── Write inputs ────────────────────────────────────────────────────────────

/// Input for creating a user. The password is hashed before it gets here.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub contact:       String,
  pub is_admin:      bool,
  pub practice_area: PracticeArea,
}

/// Full administrative update. Never touches the password or the role flag.
#[derive(Debug, Clone)]
pub struct UserUpdate {
  pub name:          String,
  pub email:         String,
  pub contact:       String,
  pub practice_area: PracticeArea,
}

/// Self-service profile update. Role and practice area are admin-controlled
/// and excluded; a password change arrives pre-hashed.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
  pub name:              String,
  pub email:             String,
  pub contact:           String,
  pub new_password_hash: Option<String>,
}
