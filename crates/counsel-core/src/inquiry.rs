//! Consultation inquiry — an anonymous public request for a consultation.
//!
//! Inquiries are immutable once created: no update path, no delete path.
//! Only staff can read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
  pub inquiry_id:   Uuid,
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone:        String,
  /// Free-form classification as submitted by the visitor; not restricted
  /// to [`crate::user::PracticeArea`].
  pub matter_type:  String,
  pub message:      String,
  /// Server-assigned at creation.
  pub submitted_at: DateTime<Utc>,
}

/// Input for a public submission. The timestamp is set by the store.
#[derive(Debug, Clone)]
pub struct NewInquiry {
  pub first_name:  String,
  pub last_name:   String,
  pub email:       String,
  pub phone:       String,
  pub matter_type: String,
  pub message:     String,
}
