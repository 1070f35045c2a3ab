//! End-to-end tests over the full router backed by an in-memory store.

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use counsel_api::{AppState, AuthConfig, auth, router};
use counsel_core::{
  store::PortalStore,
  user::{NewUser, PracticeArea},
};
use counsel_store_sqlite::SqliteStore;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

// ─── Harness ─────────────────────────────────────────────────────────────────

struct TestApp {
  router: Router,
  store:  Arc<SqliteStore>,
}

async fn app() -> TestApp {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let config = AuthConfig {
    token_secret:     "integration-test-secret".into(),
    cookie_secure:    false,
    cookie_same_site: counsel_api::auth::SameSite::Lax,
  };
  TestApp {
    router: router(AppState { store: store.clone(), auth: Arc::new(config) }),
    store,
  }
}

impl TestApp {
  async fn send(&self, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = self.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
  }

  async fn send_raw(&self, req: Request<Body>) -> axum::response::Response {
    self.router.clone().oneshot(req).await.unwrap()
  }

  /// Seed an administrator directly; registration never creates one.
  async fn seed_admin(&self, email: &str, password: &str) {
    self
      .store
      .create_user(NewUser {
        name:          "Pat Admin".into(),
        email:         email.into(),
        password_hash: auth::hash_password(password).unwrap(),
        contact:       "0000000000".into(),
        is_admin:      true,
        practice_area: PracticeArea::Others,
      })
      .await
      .unwrap();
  }

  /// Log in and return the bare `token=...` cookie pair.
  async fn login(&self, email: &str, password: &str) -> String {
    let response = self
      .send_raw(json_request(
        "POST",
        "/auth/login",
        serde_json::json!({ "email": email, "password": password }),
        None,
      ))
      .await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
      .headers()
      .get(header::SET_COOKIE)
      .expect("login must set a cookie")
      .to_str()
      .unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
  }
}

fn json_request(
  method: &str,
  uri: &str,
  body: serde_json::Value,
  cookie: Option<&str>,
) -> Request<Body> {
  let mut builder = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json");
  if let Some(cookie) = cookie {
    builder = builder.header(header::COOKIE, cookie);
  }
  builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(cookie) = cookie {
    builder = builder.header(header::COOKIE, cookie);
  }
  builder.body(Body::empty()).unwrap()
}

fn register_body(email: &str) -> serde_json::Value {
  serde_json::json!({
    "name": "Casey Client",
    "email": email,
    "password": "hunter2hunter2",
    "contact": "5551234567",
  })
}

const BOUNDARY: &str = "x-test-boundary";

fn multipart_request(
  method: &str,
  uri: &str,
  fields: &[(&str, &str)],
  file: Option<(&str, &[u8])>,
  cookie: &str,
) -> Request<Body> {
  let mut body: Vec<u8> = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; \
         name=\"{name}\"\r\n\r\n{value}\r\n"
      )
      .as_bytes(),
    );
  }
  if let Some((filename, payload)) = file {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
         filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

  Request::builder()
    .method(method)
    .uri(uri)
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .header(header::COOKIE, cookie)
    .body(Body::from(body))
    .unwrap()
}

// ─── Registration and login ──────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_client_with_default_area() {
  let app = app().await;
  let (status, body) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], true);
  assert_eq!(body["message"], "User registered successfully");
  assert_eq!(body["data"]["is_admin"], false);
  assert_eq!(body["data"]["practice_area"], "Others");
}

#[tokio::test]
async fn register_rejects_missing_fields() {
  let app = app().await;
  let (status, body) = app
    .send(json_request(
      "POST",
      "/auth/register",
      serde_json::json!({ "email": "casey@example.com" }),
      None,
    ))
    .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], false);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
  let app = app().await;
  let body = register_body("taken@example.com");
  app
    .send(json_request("POST", "/auth/register", body.clone(), None))
    .await;

  let (status, response) =
    app.send(json_request("POST", "/auth/register", body, None)).await;

  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(response["message"], "Email is already registered");
}

#[tokio::test]
async fn login_sets_session_cookie() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;

  let response = app
    .send_raw(json_request(
      "POST",
      "/auth/login",
      serde_json::json!({
        "email": "casey@example.com",
        "password": "hunter2hunter2",
      }),
      None,
    ))
    .await;

  assert_eq!(response.status(), StatusCode::OK);
  let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
  assert!(cookie.starts_with("token="));
  assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn login_with_wrong_password_sets_no_cookie() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;

  let response = app
    .send_raw(json_request(
      "POST",
      "/auth/login",
      serde_json::json!({
        "email": "casey@example.com",
        "password": "wrong-password",
      }),
      None,
    ))
    .await;

  assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
  let app = app().await;
  let (status, body) = app
    .send(json_request(
      "POST",
      "/auth/login",
      serde_json::json!({
        "email": "nobody@example.com",
        "password": "whatever123",
      }),
      None,
    ))
    .await;

  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn logout_clears_the_cookie() {
  let app = app().await;
  let response =
    app.send_raw(bare_request("POST", "/auth/logout", None)).await;

  assert_eq!(response.status(), StatusCode::OK);
  let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
  assert!(cookie.starts_with("token=;"));
  assert!(cookie.contains("Max-Age=0"));
}

// ─── Access control ──────────────────────────────────────────────────────────

#[tokio::test]
async fn protected_routes_require_a_session() {
  let app = app().await;
  for uri in ["/user/getAll", "/file/getAll", "/consultation/all"] {
    let (status, body) = app.send(bare_request("GET", uri, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    assert_eq!(body["success"], false, "{uri}");
  }
}

#[tokio::test]
async fn admin_routes_reject_client_sessions() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  for uri in ["/user/getAll", "/consultation/all"] {
    let (status, body) = app.send(bare_request("GET", uri, Some(&cookie))).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    assert_eq!(body["message"], "Admin access required", "{uri}");
  }
}

#[tokio::test]
async fn tampered_token_is_rejected() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let mut forged = cookie.clone();
  forged.pop();
  forged.push('A');
  let (status, _) =
    app.send(bare_request("GET", "/file/getAll", Some(&forged))).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── User management ─────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_lists_and_updates_users() {
  let app = app().await;
  app.seed_admin("admin@firm.example", "s3cure-pass").await;
  let admin = app.login("admin@firm.example", "s3cure-pass").await;

  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();

  let (status, listed) =
    app.send(bare_request("GET", "/user/getAll", Some(&admin))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed["data"].as_array().unwrap().len(), 2);

  let (status, updated) = app
    .send(json_request(
      "PUT",
      &format!("/user/update/{user_id}"),
      serde_json::json!({
        "name": "Casey Q. Client",
        "email": "casey@example.com",
        "contact": "5559876543",
        "type": "Family Law",
      }),
      Some(&admin),
    ))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["message"], "Client updated successfully");
  assert_eq!(updated["data"]["practice_area"], "Family Law");
}

#[tokio::test]
async fn admin_update_validates_email_and_contact() {
  let app = app().await;
  app.seed_admin("admin@firm.example", "s3cure-pass").await;
  let admin = app.login("admin@firm.example", "s3cure-pass").await;

  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();

  let (status, body) = app
    .send(json_request(
      "PUT",
      &format!("/user/update/{user_id}"),
      serde_json::json!({
        "name": "Casey",
        "email": "not-an-email",
        "contact": "5559876543",
        "type": "Family Law",
      }),
      Some(&admin),
    ))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Invalid email format");

  let (status, body) = app
    .send(json_request(
      "PUT",
      &format!("/user/update/{user_id}"),
      serde_json::json!({
        "name": "Casey",
        "email": "casey@example.com",
        "contact": "123",
        "type": "Family Law",
      }),
      Some(&admin),
    ))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Contact number must be 10 digits");
}

#[tokio::test]
async fn profile_update_is_owner_only() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let (_, other) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("other@example.com"),
      None,
    ))
    .await;
  let other_id = other["data"]["user_id"].as_str().unwrap().to_owned();

  let cookie = app.login("casey@example.com", "hunter2hunter2").await;
  let (status, body) = app
    .send(json_request(
      "PUT",
      &format!("/user/updateUserProfile/{other_id}"),
      serde_json::json!({
        "name": "Hijacked",
        "email": "other@example.com",
        "contact": "5550001111",
      }),
      Some(&cookie),
    ))
    .await;

  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["message"], "You may only edit your own profile");
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
  let app = app().await;
  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let (status, body) = app
    .send(json_request(
      "PUT",
      &format!("/user/updateUserProfile/{user_id}"),
      serde_json::json!({
        "name": "Casey Client",
        "email": "casey@example.com",
        "contact": "5551234567",
        "currentPassword": "wrong-guess",
        "newPassword": "brand-new-pass",
      }),
      Some(&cookie),
    ))
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["message"], "Current password is incorrect");

  let (status, _) = app
    .send(json_request(
      "PUT",
      &format!("/user/updateUserProfile/{user_id}"),
      serde_json::json!({
        "name": "Casey Client",
        "email": "casey@example.com",
        "contact": "5551234567",
        "currentPassword": "hunter2hunter2",
        "newPassword": "brand-new-pass",
      }),
      Some(&cookie),
    ))
    .await;
  assert_eq!(status, StatusCode::OK);

  // Old password no longer works, new one does.
  let (status, _) = app
    .send(json_request(
      "POST",
      "/auth/login",
      serde_json::json!({
        "email": "casey@example.com",
        "password": "hunter2hunter2",
      }),
      None,
    ))
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  app.login("casey@example.com", "brand-new-pass").await;
}

#[tokio::test]
async fn admin_deletes_a_user() {
  let app = app().await;
  app.seed_admin("admin@firm.example", "s3cure-pass").await;
  let admin = app.login("admin@firm.example", "s3cure-pass").await;

  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();

  let (status, body) = app
    .send(bare_request(
      "DELETE",
      &format!("/user/delete/{user_id}"),
      Some(&admin),
    ))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "User deleted successfully");

  let (status, _) = app
    .send(bare_request(
      "GET",
      &format!("/user/get/{user_id}"),
      Some(&admin),
    ))
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_rejected_up_front() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let (status, body) =
    app.send(bare_request("GET", "/user/get/not-a-uuid", Some(&cookie))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Invalid user ID format");
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_and_fetch_a_document() {
  let app = app().await;
  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let payload: Vec<u8> = (0u8..=255).cycle().take(1024).collect();
  let (status, body) = app
    .send(multipart_request(
      "POST",
      "/file/upload",
      &[("userId", &user_id), ("name", "Engagement letter")],
      Some(("letter.pdf", &payload)),
      &cookie,
    ))
    .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["message"], "File uploaded successfully");
  assert_eq!(body["data"]["file_name"], "letter.pdf");
  assert_eq!(body["data"]["media_type"], "application/pdf");

  let (status, listed) = app
    .send(bare_request(
      "GET",
      &format!("/file/get/{user_id}"),
      Some(&cookie),
    ))
    .await;
  assert_eq!(status, StatusCode::OK);
  let documents = listed["data"].as_array().unwrap();
  assert_eq!(documents.len(), 1);

  // The payload survives the round trip bit for bit.
  use base64::Engine as _;
  let returned = base64::engine::general_purpose::STANDARD
    .decode(documents[0]["payload"].as_str().unwrap())
    .unwrap();
  assert_eq!(returned, payload);
}

#[tokio::test]
async fn upload_without_a_file_part_fails() {
  let app = app().await;
  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let (status, body) = app
    .send(multipart_request(
      "POST",
      "/file/upload",
      &[("userId", &user_id), ("name", "Engagement letter")],
      None,
      &cookie,
    ))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn upload_missing_metadata_fails() {
  let app = app().await;
  app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let (status, body) = app
    .send(multipart_request(
      "POST",
      "/file/upload",
      &[("name", "Engagement letter")],
      Some(("letter.pdf", b"content")),
      &cookie,
    ))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
  let app = app().await;
  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let payload = vec![0u8; 5 * 1024 * 1024 + 1];
  let (status, _) = app
    .send(multipart_request(
      "POST",
      "/file/upload",
      &[("userId", &user_id), ("name", "Huge")],
      Some(("huge.bin", &payload)),
      &cookie,
    ))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_and_delete_a_document() {
  let app = app().await;
  let (_, created) = app
    .send(json_request(
      "POST",
      "/auth/register",
      register_body("casey@example.com"),
      None,
    ))
    .await;
  let user_id = created["data"]["user_id"].as_str().unwrap().to_owned();
  let cookie = app.login("casey@example.com", "hunter2hunter2").await;

  let (_, uploaded) = app
    .send(multipart_request(
      "POST",
      "/file/upload",
      &[("userId", &user_id), ("name", "Draft")],
      Some(("draft-v1.pdf", b"first draft")),
      &cookie,
    ))
    .await;
  let file_id = uploaded["data"]["document_id"].as_str().unwrap().to_owned();

  let replace = multipart_request(
    "PUT",
    &format!("/file/update/{file_id}"),
    &[],
    Some(("draft-v2.pdf", b"second draft")),
    &cookie,
  );
  let (status, body) = app.send(replace).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "File updated successfully");
  assert_eq!(body["data"]["file_name"], "draft-v2.pdf");
  // Display name is not part of a replace.
  assert_eq!(body["data"]["name"], "Draft");

  let (status, body) = app
    .send(bare_request(
      "DELETE",
      &format!("/file/delete/{file_id}"),
      Some(&cookie),
    ))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "File deleted successfully");

  let (_, listed) = app
    .send(bare_request(
      "GET",
      &format!("/file/get/{user_id}"),
      Some(&cookie),
    ))
    .await;
  assert_eq!(listed["data"].as_array().unwrap().len(), 0);
}

// ─── Consultations ───────────────────────────────────────────────────────────

#[tokio::test]
async fn consultation_submit_is_public_and_listing_is_admin_only() {
  let app = app().await;

  let (status, body) = app
    .send(json_request(
      "POST",
      "/consultation/submit",
      serde_json::json!({
        "firstName": "Morgan",
        "lastName": "Reyes",
        "email": "morgan@example.com",
        "phone": "5557778888",
        "legalMatterType": "Contract dispute",
        "message": "I need advice on a vendor agreement.",
      }),
      None,
    ))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["message"], "Consultation request submitted successfully");

  app.seed_admin("admin@firm.example", "s3cure-pass").await;
  let admin = app.login("admin@firm.example", "s3cure-pass").await;
  let (status, listed) =
    app.send(bare_request("GET", "/consultation/all", Some(&admin))).await;
  assert_eq!(status, StatusCode::OK);
  let inquiries = listed["data"].as_array().unwrap();
  assert_eq!(inquiries.len(), 1);
  assert_eq!(inquiries[0]["matter_type"], "Contract dispute");
}

#[tokio::test]
async fn consultation_submit_requires_every_field() {
  let app = app().await;
  let (status, body) = app
    .send(json_request(
      "POST",
      "/consultation/submit",
      serde_json::json!({
        "firstName": "Morgan",
        "email": "morgan@example.com",
      }),
      None,
    ))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "All fields are required");
}
