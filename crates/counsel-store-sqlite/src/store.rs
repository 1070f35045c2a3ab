//! [`SqliteStore`] — the SQLite implementation of [`PortalStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use counsel_core::{
  document::{Document, DocumentReplacement, DocumentWithOwner, NewDocument},
  inquiry::{Inquiry, NewInquiry},
  store::PortalStore,
  user::{NewUser, ProfileUpdate, User, UserCredentials, UserUpdate},
};

use crate::{
  Error, Result,
  encode::{
    RawDocument, RawInquiry, RawUser, encode_dt, encode_payload,
    encode_practice_area, encode_uuid,
  },
  schema::SCHEMA,
};

/// Outcome of a guarded write executed inside a single connection call.
/// Checks and the write itself happen in one closure so no other caller can
/// interleave between them.
enum WriteOutcome<T> {
  Missing,
  EmailCollision(String),
  Done(T),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Counsel portal store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_raw_user(&self, id: Uuid) -> Result<Option<RawUser>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM users WHERE user_id = ?1",
                RawUser::COLUMNS
              ),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now = Utc::now();
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      contact:       input.contact,
      is_admin:      input.is_admin,
      practice_area: input.practice_area,
      created_at:    now,
      updated_at:    now,
    };

    let id_str    = encode_uuid(user.user_id);
    let name      = user.name.clone();
    let email     = user.email.clone();
    let hash      = input.password_hash;
    let contact   = user.contact.clone();
    let is_admin  = user.is_admin;
    let area_str  = encode_practice_area(user.practice_area).to_owned();
    let at_str    = encode_dt(now);

    let outcome: WriteOutcome<()> = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT user_id FROM users WHERE email = ?1",
            rusqlite::params![email],
            |r| r.get(0),
          )
          .optional()?;

        if existing.is_some() {
          return Ok(WriteOutcome::EmailCollision(email));
        }

        conn.execute(
          "INSERT INTO users (
             user_id, name, email, password_hash, contact, is_admin,
             practice_area, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, name, email, hash, contact, is_admin, area_str, at_str,
          ],
        )?;

        Ok(WriteOutcome::Done(()))
      })
      .await?;

    match outcome {
      WriteOutcome::EmailCollision(email) => Err(Error::EmailTaken(email)),
      _ => Ok(user),
    }
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self
      .get_raw_user(id)
      .await?
      .map(RawUser::into_user)
      .transpose()
  }

  async fn get_user_credentials(
    &self,
    id: Uuid,
  ) -> Result<Option<UserCredentials>> {
    self
      .get_raw_user(id)
      .await?
      .map(RawUser::into_credentials)
      .transpose()
  }

  async fn find_credentials_by_email(
    &self,
    email: &str,
  ) -> Result<Option<UserCredentials>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM users WHERE email = ?1",
                RawUser::COLUMNS
              ),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_credentials).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM users ORDER BY created_at",
          RawUser::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User> {
    let id_str   = encode_uuid(id);
    let name     = update.name;
    let email    = update.email;
    let contact  = update.contact;
    let area_str = encode_practice_area(update.practice_area).to_owned();
    let at_str   = encode_dt(Utc::now());

    let outcome: WriteOutcome<RawUser> = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(WriteOutcome::Missing);
        }

        // The new email must not belong to a different user.
        let collides: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1 AND user_id != ?2",
            rusqlite::params![email, id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if collides {
          return Ok(WriteOutcome::EmailCollision(email));
        }

        conn.execute(
          "UPDATE users
           SET name = ?1, email = ?2, contact = ?3, practice_area = ?4,
               updated_at = ?5
           WHERE user_id = ?6",
          rusqlite::params![name, email, contact, area_str, at_str, id_str],
        )?;

        let raw = conn.query_row(
          &format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS),
          rusqlite::params![id_str],
          RawUser::from_row,
        )?;

        Ok(WriteOutcome::Done(raw))
      })
      .await?;

    match outcome {
      WriteOutcome::Missing => Err(Error::UserNotFound(id)),
      WriteOutcome::EmailCollision(email) => Err(Error::EmailTaken(email)),
      WriteOutcome::Done(raw) => raw.into_user(),
    }
  }

  async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> Result<User> {
    let id_str   = encode_uuid(id);
    let name     = update.name;
    let email    = update.email;
    let contact  = update.contact;
    let new_hash = update.new_password_hash;
    let at_str   = encode_dt(Utc::now());

    let outcome: WriteOutcome<RawUser> = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(WriteOutcome::Missing);
        }

        let collides: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1 AND user_id != ?2",
            rusqlite::params![email, id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if collides {
          return Ok(WriteOutcome::EmailCollision(email));
        }

        conn.execute(
          "UPDATE users
           SET name = ?1, email = ?2, contact = ?3, updated_at = ?4
           WHERE user_id = ?5",
          rusqlite::params![name, email, contact, at_str, id_str],
        )?;

        if let Some(hash) = new_hash {
          conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE user_id = ?2",
            rusqlite::params![hash, id_str],
          )?;
        }

        let raw = conn.query_row(
          &format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS),
          rusqlite::params![id_str],
          RawUser::from_row,
        )?;

        Ok(WriteOutcome::Done(raw))
      })
      .await?;

    match outcome {
      WriteOutcome::Missing => Err(Error::UserNotFound(id)),
      WriteOutcome::EmailCollision(email) => Err(Error::EmailTaken(email)),
      WriteOutcome::Done(raw) => raw.into_user(),
    }
  }

  async fn delete_user(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    // ON DELETE CASCADE removes the user's documents within the same
    // statement transaction.
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::UserNotFound(id));
    }
    Ok(())
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn add_document(&self, input: NewDocument) -> Result<Document> {
    let document = Document {
      document_id: Uuid::new_v4(),
      user_id:     input.user_id,
      name:        input.name,
      file_name:   input.file_name,
      media_type:  input.media_type,
      payload:     input.payload,
      uploaded_at: Utc::now(),
    };

    let doc_id_str  = encode_uuid(document.document_id);
    let user_id_str = encode_uuid(document.user_id);
    let name        = document.name.clone();
    let file_name   = document.file_name.clone();
    let media_type  = document.media_type.clone();
    let payload_str = encode_payload(&document.payload);
    let at_str      = encode_dt(document.uploaded_at);

    let outcome: WriteOutcome<()> = self
      .conn
      .call(move |conn| {
        let owner_exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![user_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !owner_exists {
          return Ok(WriteOutcome::Missing);
        }

        conn.execute(
          "INSERT INTO documents (
             document_id, user_id, name, file_name, media_type, payload_b64,
             uploaded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            doc_id_str, user_id_str, name, file_name, media_type, payload_str,
            at_str,
          ],
        )?;

        Ok(WriteOutcome::Done(()))
      })
      .await?;

    match outcome {
      WriteOutcome::Missing => Err(Error::UserNotFound(document.user_id)),
      _ => Ok(document),
    }
  }

  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM documents WHERE document_id = ?1",
                RawDocument::COLUMNS
              ),
              rusqlite::params![id_str],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_documents_for_user(&self, user_id: Uuid) -> Result<Vec<Document>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM documents WHERE user_id = ?1 ORDER BY uploaded_at",
          RawDocument::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn list_documents(&self) -> Result<Vec<DocumentWithOwner>> {
    let raws: Vec<RawDocument> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT d.document_id, d.user_id, d.name, d.file_name,
                  d.media_type, d.payload_b64, d.uploaded_at, u.name
           FROM documents d
           JOIN users u ON u.user_id = d.user_id
           ORDER BY d.uploaded_at",
        )?;
        let rows = stmt
          .query_map([], RawDocument::from_row_with_owner)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawDocument::into_document_with_owner)
      .collect()
  }

  async fn replace_document(
    &self,
    id: Uuid,
    replacement: DocumentReplacement,
  ) -> Result<Document> {
    let id_str      = encode_uuid(id);
    let file_name   = replacement.file_name;
    let media_type  = replacement.media_type;
    let payload_str = encode_payload(&replacement.payload);
    let at_str      = encode_dt(Utc::now());

    let outcome: WriteOutcome<RawDocument> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE documents
           SET file_name = ?1, media_type = ?2, payload_b64 = ?3,
               uploaded_at = ?4
           WHERE document_id = ?5",
          rusqlite::params![file_name, media_type, payload_str, at_str, id_str],
        )?;

        if changed == 0 {
          return Ok(WriteOutcome::Missing);
        }

        let raw = conn.query_row(
          &format!(
            "SELECT {} FROM documents WHERE document_id = ?1",
            RawDocument::COLUMNS
          ),
          rusqlite::params![id_str],
          RawDocument::from_row,
        )?;

        Ok(WriteOutcome::Done(raw))
      })
      .await?;

    match outcome {
      WriteOutcome::Done(raw) => raw.into_document(),
      _ => Err(Error::DocumentNotFound(id)),
    }
  }

  async fn delete_document(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE document_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::DocumentNotFound(id));
    }
    Ok(())
  }

  // ── Inquiries ─────────────────────────────────────────────────────────────

  async fn add_inquiry(&self, input: NewInquiry) -> Result<Inquiry> {
    let inquiry = Inquiry {
      inquiry_id:   Uuid::new_v4(),
      first_name:   input.first_name,
      last_name:    input.last_name,
      email:        input.email,
      phone:        input.phone,
      matter_type:  input.matter_type,
      message:      input.message,
      submitted_at: Utc::now(),
    };

    let id_str      = encode_uuid(inquiry.inquiry_id);
    let first_name  = inquiry.first_name.clone();
    let last_name   = inquiry.last_name.clone();
    let email       = inquiry.email.clone();
    let phone       = inquiry.phone.clone();
    let matter_type = inquiry.matter_type.clone();
    let message     = inquiry.message.clone();
    let at_str      = encode_dt(inquiry.submitted_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO inquiries (
             inquiry_id, first_name, last_name, email, phone, matter_type,
             message, submitted_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, first_name, last_name, email, phone, matter_type, message,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(inquiry)
  }

  async fn list_inquiries(&self) -> Result<Vec<Inquiry>> {
    let raws: Vec<RawInquiry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM inquiries ORDER BY submitted_at DESC",
          RawInquiry::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawInquiry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInquiry::into_inquiry).collect()
  }
}
