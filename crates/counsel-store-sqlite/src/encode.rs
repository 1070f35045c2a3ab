//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Practice areas are stored
//! by display name. UUIDs are stored as hyphenated lowercase strings.
//! Document payloads are stored as standard base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{DateTime, Utc};
use counsel_core::{
  document::{Document, DocumentWithOwner},
  inquiry::Inquiry,
  user::{PracticeArea, User, UserCredentials},
};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| crate::Error::DateParse(e.to_string()))
}

// ─── PracticeArea ─────────────────────────────────────────────────────────────

pub fn encode_practice_area(area: PracticeArea) -> &'static str {
  area.as_str()
}

pub fn decode_practice_area(s: &str) -> Result<PracticeArea> {
  Ok(s.parse::<PracticeArea>().map_err(counsel_core::Error::from)?)
}

// ─── Payload ──────────────────────────────────────────────────────────────────

pub fn encode_payload(bytes: &[u8]) -> String { B64.encode(bytes) }

pub fn decode_payload(s: &str) -> Result<Vec<u8>> {
  Ok(B64.decode(s.as_bytes())?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub contact:       String,
  pub is_admin:      bool,
  pub practice_area: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  /// SELECT column list matching the field order expected by [`from_row`].
  ///
  /// [`from_row`]: RawUser::from_row
  pub const COLUMNS: &'static str =
    "user_id, name, email, password_hash, contact, is_admin, practice_area, \
     created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      contact:       row.get(4)?,
      is_admin:      row.get(5)?,
      practice_area: row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      contact:       self.contact,
      is_admin:      self.is_admin,
      practice_area: decode_practice_area(&self.practice_area)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }

  pub fn into_credentials(self) -> Result<UserCredentials> {
    let password_hash = self.password_hash.clone();
    Ok(UserCredentials { user: self.into_user()?, password_hash })
  }
}

/// Raw strings read directly from a `documents` row, optionally joined with
/// the owner's name.
pub struct RawDocument {
  pub document_id: String,
  pub user_id:     String,
  pub name:        String,
  pub file_name:   String,
  pub media_type:  String,
  pub payload_b64: String,
  pub uploaded_at: String,
  /// Present only on queries that join `users`.
  pub owner_name:  Option<String>,
}

impl RawDocument {
  pub const COLUMNS: &'static str =
    "document_id, user_id, name, file_name, media_type, payload_b64, \
     uploaded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawDocument {
      document_id: row.get(0)?,
      user_id:     row.get(1)?,
      name:        row.get(2)?,
      file_name:   row.get(3)?,
      media_type:  row.get(4)?,
      payload_b64: row.get(5)?,
      uploaded_at: row.get(6)?,
      owner_name:  None,
    })
  }

  /// As [`from_row`], with the owner's name in an eighth column.
  ///
  /// [`from_row`]: RawDocument::from_row
  pub fn from_row_with_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut raw = Self::from_row(row)?;
    raw.owner_name = Some(row.get(7)?);
    Ok(raw)
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id: decode_uuid(&self.document_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      name:        self.name,
      file_name:   self.file_name,
      media_type:  self.media_type,
      payload:     decode_payload(&self.payload_b64)?,
      uploaded_at: decode_dt(&self.uploaded_at)?,
    })
  }

  pub fn into_document_with_owner(self) -> Result<DocumentWithOwner> {
    let owner_name = self.owner_name.clone().unwrap_or_default();
    Ok(DocumentWithOwner { document: self.into_document()?, owner_name })
  }
}

/// Raw strings read directly from an `inquiries` row.
pub struct RawInquiry {
  pub inquiry_id:   String,
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone:        String,
  pub matter_type:  String,
  pub message:      String,
  pub submitted_at: String,
}

impl RawInquiry {
  pub const COLUMNS: &'static str =
    "inquiry_id, first_name, last_name, email, phone, matter_type, message, \
     submitted_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawInquiry {
      inquiry_id:   row.get(0)?,
      first_name:   row.get(1)?,
      last_name:    row.get(2)?,
      email:        row.get(3)?,
      phone:        row.get(4)?,
      matter_type:  row.get(5)?,
      message:      row.get(6)?,
      submitted_at: row.get(7)?,
    })
  }

  pub fn into_inquiry(self) -> Result<Inquiry> {
    Ok(Inquiry {
      inquiry_id:   decode_uuid(&self.inquiry_id)?,
      first_name:   self.first_name,
      last_name:    self.last_name,
      email:        self.email,
      phone:        self.phone,
      matter_type:  self.matter_type,
      message:      self.message,
      submitted_at: decode_dt(&self.submitted_at)?,
    })
  }
}
