//! Document — an uploaded file owned by exactly one user.
//!
//! The binary payload is stored in a text-safe base64 representation and is
//! serialized the same way on the wire. Decoding must reproduce the uploaded
//! bytes exactly; the backing representation is an implementation detail of
//! the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ingress cap on a single document payload.
pub const MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// An uploaded document. Replacement is wholesale; there is no versioning
/// and no partial update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub document_id: Uuid,
  /// Owning user. Required at creation; deletion of the owner cascades.
  pub user_id:     Uuid,
  /// User-assigned display name, fixed for the life of the document.
  pub name:        String,
  /// Original filename captured from the upload.
  pub file_name:   String,
  /// Declared media type captured from the upload.
  pub media_type:  String,
  #[serde(with = "payload_b64")]
  pub payload:     Vec<u8>,
  pub uploaded_at: DateTime<Utc>,
}

/// A document joined with its owner's display name, for the staff-wide list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWithOwner {
  #[serde(flatten)]
  pub document:   Document,
  pub owner_name: String,
}

/// Input for an upload.
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub user_id:    Uuid,
  pub name:       String,
  pub file_name:  String,
  pub media_type: String,
  pub payload:    Vec<u8>,
}

/// Input for a wholesale replace. Owner and display name are fixed.
#[derive(Debug, Clone)]
pub struct DocumentReplacement {
  pub file_name:  String,
  pub media_type: String,
  pub payload:    Vec<u8>,
}

// ─── Payload serde ───────────────────────────────────────────────────────────

/// Serialize the payload as a standard base64 string, matching the stored
/// representation.
pub mod payload_b64 {
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    bytes: &[u8],
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&B64.encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    B64.decode(encoded.as_bytes()).map_err(D::Error::custom)
  }
}
