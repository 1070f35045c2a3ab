//! Handlers for the `/file` endpoints.
//!
//! Uploads arrive as multipart form data (`userId`, `name`, `file`); the
//! binary payload is handed to the store, which keeps it in a text-safe
//! encoding. Decoding a stored payload reproduces the uploaded bytes
//! exactly. Payloads over 5 MiB are rejected before anything is persisted.

use axum::{
  Json,
  extract::{Multipart, Path, State},
  response::IntoResponse,
};
use counsel_core::{
  document::{DocumentReplacement, MAX_PAYLOAD_BYTES, NewDocument},
  store::PortalStore,
};

use crate::{
  AppState, auth::Identity, created_with, error::ApiError, ok, ok_with,
  users::parse_id,
};

/// One `file` part pulled out of a multipart body.
struct FilePart {
  file_name:  String,
  media_type: String,
  payload:    Vec<u8>,
}

impl FilePart {
  async fn read(field: axum::extract::multipart::Field<'_>) -> Result<Self, ApiError> {
    let file_name = field.file_name().unwrap_or("upload").to_owned();
    let media_type = field
      .content_type()
      .unwrap_or("application/octet-stream")
      .to_owned();
    let payload = field
      .bytes()
      .await
      .map_err(|e| ApiError::Validation(format!("Failed to read uploaded file: {e}")))?
      .to_vec();
    Ok(FilePart { file_name, media_type, payload })
  }

  /// Enforce the ingress cap before anything touches the store.
  fn validate(self) -> Result<Self, ApiError> {
    if self.payload.is_empty() {
      return Err(ApiError::Validation("Uploaded file is empty".into()));
    }
    if self.payload.len() > MAX_PAYLOAD_BYTES {
      return Err(ApiError::Validation(
        "File exceeds the 5 MiB limit".into(),
      ));
    }
    Ok(self)
  }
}

// ─── Upload ───────────────────────────────────────────────────────────────────

/// `POST /file/upload` — multipart fields: `userId`, `name`, `file`.
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let mut user_id: Option<String> = None;
  let mut name: Option<String> = None;
  let mut file: Option<FilePart> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::Validation(format!("Multipart error: {e}")))?
  {
    match field.name().unwrap_or("") {
      "userId" => {
        user_id = Some(field.text().await.map_err(|e| {
          ApiError::Validation(format!("Multipart error: {e}"))
        })?);
      }
      "name" => {
        name = Some(field.text().await.map_err(|e| {
          ApiError::Validation(format!("Multipart error: {e}"))
        })?);
      }
      "file" => file = Some(FilePart::read(field).await?),
      _ => {}
    }
  }

  let (Some(user_id), Some(name)) = (user_id, name) else {
    return Err(ApiError::Validation("All fields are required".into()));
  };
  if user_id.is_empty() || name.is_empty() {
    return Err(ApiError::Validation("All fields are required".into()));
  }
  let file = file
    .ok_or_else(|| ApiError::Validation("No file uploaded".into()))?
    .validate()?;

  let user_id = parse_id(&user_id, "user")?;

  let document = state
    .store
    .add_document(NewDocument {
      user_id,
      name,
      file_name: file.file_name,
      media_type: file.media_type,
      payload: file.payload,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok(created_with("File uploaded successfully", document))
}

// ─── List by user ─────────────────────────────────────────────────────────────

/// `GET /file/get/:id` — documents owned by user `:id`. An empty list is a
/// valid, non-error response, consistent with the user listing.
pub async fn list_for_user<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
  Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let user_id = parse_id(&id, "user")?;
  let documents = state
    .store
    .list_documents_for_user(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok_with("Files retrieved successfully", documents))
}

// ─── List all ─────────────────────────────────────────────────────────────────

/// `GET /file/getAll` — every document, with owner names resolved.
pub async fn list_all<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let documents = state
    .store
    .list_documents()
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok_with("Files retrieved successfully", documents))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /file/update/:id` — wholesale replace of filename, media type, and
/// payload. Owner and display name cannot change.
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
  Path(id): Path<String>,
  mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let id = parse_id(&id, "file")?;

  let mut file: Option<FilePart> = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::Validation(format!("Multipart error: {e}")))?
  {
    if field.name() == Some("file") {
      file = Some(FilePart::read(field).await?);
    }
  }

  let file = file
    .ok_or_else(|| ApiError::Validation("No file uploaded".into()))?
    .validate()?;

  let document = state
    .store
    .replace_document(
      id,
      DocumentReplacement {
        file_name:  file.file_name,
        media_type: file.media_type,
        payload:    file.payload,
      },
    )
    .await
    .map_err(ApiError::from_store)?;

  Ok(ok_with("File updated successfully", document))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /file/delete/:id` — hard delete, irreversible.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
  Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PortalStore + Clone + Send + Sync + 'static,
{
  let id = parse_id(&id, "file")?;
  state
    .store
    .delete_document(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok("File deleted successfully"))
}
