//! Async HTTP client wrapping the Counsel portal JSON API.
//!
//! The session cookie set at login lives in the client's cookie store and
//! rides along on every subsequent request.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use counsel_core::{
  document::{Document, DocumentWithOwner},
  inquiry::Inquiry,
  user::{PracticeArea, User},
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the portal API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Fields for a self-service profile update.
#[derive(Debug, Clone)]
pub struct ProfileChange {
  pub name:             String,
  pub email:            String,
  pub contact:          String,
  pub current_password: Option<String>,
  pub new_password:     Option<String>,
}

/// The uniform response envelope every endpoint wraps its payload in.
#[derive(serde::Deserialize)]
struct Envelope<T> {
  success: bool,
  #[serde(default)]
  message: String,
  data:    Option<T>,
}

/// Async HTTP client for the portal REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .cookie_store(true)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Unwrap the envelope, surfacing the server's message on failure.
  async fn decode<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
  ) -> Result<T> {
    let status = resp.status();
    let envelope: Envelope<T> = resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))?;
    if !status.is_success() || !envelope.success {
      return Err(anyhow!("{what} → {status}: {}", envelope.message));
    }
    envelope
      .data
      .ok_or_else(|| anyhow!("{what}: response carried no data"))
  }

  /// As [`Self::decode`] for endpoints whose payload is just the message.
  async fn decode_message(
    resp: reqwest::Response,
    what: &str,
  ) -> Result<String> {
    let status = resp.status();
    let envelope: Envelope<serde_json::Value> = resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))?;
    if !status.is_success() || !envelope.success {
      return Err(anyhow!("{what} → {status}: {}", envelope.message));
    }
    Ok(envelope.message)
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `POST /auth/register`
  pub async fn register(
    &self,
    name: &str,
    email: &str,
    password: &str,
    contact: &str,
  ) -> Result<User> {
    let resp = self
      .client
      .post(self.url("/auth/register"))
      .json(&json!({
        "name": name,
        "email": email,
        "password": password,
        "contact": contact,
      }))
      .send()
      .await
      .context("POST /auth/register failed")?;
    Self::decode(resp, "register").await
  }

  /// `POST /auth/login` — the session cookie lands in the cookie store.
  pub async fn login(&self, email: &str, password: &str) -> Result<User> {
    let resp = self
      .client
      .post(self.url("/auth/login"))
      .json(&json!({ "email": email, "password": password }))
      .send()
      .await
      .context("POST /auth/login failed")?;
    Self::decode(resp, "login").await
  }

  /// `POST /auth/logout`
  pub async fn logout(&self) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/auth/logout"))
      .send()
      .await
      .context("POST /auth/logout failed")?;
    Self::decode_message(resp, "logout").await?;
    Ok(())
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /user/getAll`
  pub async fn list_users(&self) -> Result<Vec<User>> {
    let resp = self
      .client
      .get(self.url("/user/getAll"))
      .send()
      .await
      .context("GET /user/getAll failed")?;
    Self::decode(resp, "list users").await
  }

  /// `GET /user/get/:id`
  pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
    let resp = self
      .client
      .get(self.url(&format!("/user/get/{user_id}")))
      .send()
      .await
      .context("GET /user/get failed")?;
    Self::decode(resp, "get user").await
  }

  /// `PUT /user/update/:id`
  pub async fn update_user(
    &self,
    user_id: Uuid,
    name: &str,
    email: &str,
    contact: &str,
    area: PracticeArea,
  ) -> Result<User> {
    let resp = self
      .client
      .put(self.url(&format!("/user/update/{user_id}")))
      .json(&json!({
        "name": name,
        "email": email,
        "contact": contact,
        "type": area.as_str(),
      }))
      .send()
      .await
      .context("PUT /user/update failed")?;
    Self::decode(resp, "update user").await
  }

  /// `PUT /user/updateUserProfile/:id`
  pub async fn update_profile(
    &self,
    user_id: Uuid,
    change: &ProfileChange,
  ) -> Result<User> {
    let resp = self
      .client
      .put(self.url(&format!("/user/updateUserProfile/{user_id}")))
      .json(&json!({
        "name": change.name,
        "email": change.email,
        "contact": change.contact,
        "currentPassword": change.current_password,
        "newPassword": change.new_password,
      }))
      .send()
      .await
      .context("PUT /user/updateUserProfile failed")?;
    Self::decode(resp, "update profile").await
  }

  /// `DELETE /user/delete/:id`
  pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/user/delete/{user_id}")))
      .send()
      .await
      .context("DELETE /user/delete failed")?;
    Self::decode_message(resp, "delete user").await?;
    Ok(())
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  /// `POST /file/upload` — multipart; reads the payload from `path`.
  pub async fn upload_document(
    &self,
    user_id: Uuid,
    name: &str,
    path: &Path,
  ) -> Result<Document> {
    let form = reqwest::multipart::Form::new()
      .text("userId", user_id.to_string())
      .text("name", name.to_owned())
      .part("file", file_part(path).await?);

    let resp = self
      .client
      .post(self.url("/file/upload"))
      .multipart(form)
      .send()
      .await
      .context("POST /file/upload failed")?;
    Self::decode(resp, "upload document").await
  }

  /// `GET /file/get/:id` — documents owned by one user.
  pub async fn documents_for_user(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<Document>> {
    let resp = self
      .client
      .get(self.url(&format!("/file/get/{user_id}")))
      .send()
      .await
      .context("GET /file/get failed")?;
    Self::decode(resp, "list documents").await
  }

  /// `GET /file/getAll`
  pub async fn all_documents(&self) -> Result<Vec<DocumentWithOwner>> {
    let resp = self
      .client
      .get(self.url("/file/getAll"))
      .send()
      .await
      .context("GET /file/getAll failed")?;
    Self::decode(resp, "list all documents").await
  }

  /// `PUT /file/update/:id` — wholesale payload replacement from `path`.
  pub async fn replace_document(
    &self,
    document_id: Uuid,
    path: &Path,
  ) -> Result<Document> {
    let form =
      reqwest::multipart::Form::new().part("file", file_part(path).await?);

    let resp = self
      .client
      .put(self.url(&format!("/file/update/{document_id}")))
      .multipart(form)
      .send()
      .await
      .context("PUT /file/update failed")?;
    Self::decode(resp, "replace document").await
  }

  /// `DELETE /file/delete/:id`
  pub async fn delete_document(&self, document_id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/file/delete/{document_id}")))
      .send()
      .await
      .context("DELETE /file/delete failed")?;
    Self::decode_message(resp, "delete document").await?;
    Ok(())
  }

  // ── Inquiries ─────────────────────────────────────────────────────────────

  /// `POST /consultation/submit`
  pub async fn submit_inquiry(
    &self,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    matter_type: &str,
    message: &str,
  ) -> Result<Inquiry> {
    let resp = self
      .client
      .post(self.url("/consultation/submit"))
      .json(&json!({
        "firstName": first_name,
        "lastName": last_name,
        "email": email,
        "phone": phone,
        "legalMatterType": matter_type,
        "message": message,
      }))
      .send()
      .await
      .context("POST /consultation/submit failed")?;
    Self::decode(resp, "submit inquiry").await
  }

  /// `GET /consultation/all`
  pub async fn list_inquiries(&self) -> Result<Vec<Inquiry>> {
    let resp = self
      .client
      .get(self.url("/consultation/all"))
      .send()
      .await
      .context("GET /consultation/all failed")?;
    Self::decode(resp, "list inquiries").await
  }
}

/// Build a multipart file part from a local path.
async fn file_part(path: &Path) -> Result<reqwest::multipart::Part> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "upload".to_owned());
  Ok(
    reqwest::multipart::Part::bytes(bytes)
      .file_name(file_name)
      .mime_str("application/octet-stream")
      .context("setting upload media type")?,
  )
}
