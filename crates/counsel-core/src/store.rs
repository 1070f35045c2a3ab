//! The `PortalStore` trait and its write-input types.
//!
//! The trait is implemented by storage backends (e.g.
//! `counsel-store-sqlite`). Higher layers (`counsel-api`) depend on this
//! abstraction, not on any concrete backend, so the payload representation
//! (base64 in a database column today) can change without touching the API
//! contract.

use std::future::Future;

use uuid::Uuid;

use crate::{
  document::{Document, DocumentReplacement, DocumentWithOwner, NewDocument},
  inquiry::{Inquiry, NewInquiry},
  user::{NewUser, ProfileUpdate, User, UserCredentials, UserUpdate},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Coarse classification of a store failure, so transport layers can map
/// backend errors to response statuses without depending on a concrete
/// backend's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  UserNotFound,
  DocumentNotFound,
  EmailTaken,
  /// Anything else — I/O, corruption, encoding. Treated as internal.
  Other,
}

/// Implemented by every [`PortalStore`] error type.
pub trait StoreError {
  fn kind(&self) -> StoreErrorKind;
}

/// Abstraction over a Counsel portal store backend.
///
/// Every mutation touches exactly one record, except [`delete_user`], which
/// atomically removes the user's documents as well. Empty collections are
/// valid, successful results on every list method.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// [`delete_user`]: PortalStore::delete_user
pub trait PortalStore: Send + Sync {
  type Error: std::error::Error + StoreError + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new user. Fails if the email is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user plus password hash by id, for password-change
  /// verification.
  fn get_user_credentials(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + '_;

  /// Look up a user plus password hash by email, for login.
  fn find_credentials_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;

  /// List all users.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Administrative full update: name, email, contact, practice area.
  /// Fails if the new email collides with a different existing user.
  fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Self-service profile update: name, email, contact, and optionally a
  /// pre-hashed replacement password.
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Hard-delete a user and, in the same transaction, every document they
  /// own.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Persist an uploaded document. The owner must exist.
  fn add_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// Retrieve a document by id. Returns `None` if not found.
  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// List the documents owned by one user.
  fn list_documents_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// List every document, with owner display names resolved.
  fn list_documents(
    &self,
  ) -> impl Future<Output = Result<Vec<DocumentWithOwner>, Self::Error>> + Send + '_;

  /// Wholesale replace of filename, media type, and payload; refreshes the
  /// upload timestamp. Owner and display name are untouched.
  fn replace_document(
    &self,
    id: Uuid,
    replacement: DocumentReplacement,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// Hard-delete a document. Irreversible.
  fn delete_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Inquiries ─────────────────────────────────────────────────────────

  /// Persist a public consultation inquiry. The submission timestamp is
  /// assigned by the store.
  fn add_inquiry(
    &self,
    input: NewInquiry,
  ) -> impl Future<Output = Result<Inquiry, Self::Error>> + Send + '_;

  /// List all inquiries, newest first.
  fn list_inquiries(
    &self,
  ) -> impl Future<Output = Result<Vec<Inquiry>, Self::Error>> + Send + '_;
}
