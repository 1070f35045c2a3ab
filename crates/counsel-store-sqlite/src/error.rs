//! Error type for `counsel-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] counsel_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("payload decode error: {0}")]
  PayloadDecode(#[from] base64::DecodeError),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("document not found: {0}")]
  DocumentNotFound(Uuid),

  #[error("email is already registered: {0}")]
  EmailTaken(String),
}

impl counsel_core::store::StoreError for Error {
  fn kind(&self) -> counsel_core::store::StoreErrorKind {
    use counsel_core::store::StoreErrorKind;
    match self {
      Error::UserNotFound(_) => StoreErrorKind::UserNotFound,
      Error::DocumentNotFound(_) => StoreErrorKind::DocumentNotFound,
      Error::EmailTaken(_) => StoreErrorKind::EmailTaken,
      _ => StoreErrorKind::Other,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
