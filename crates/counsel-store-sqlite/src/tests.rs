//! Integration tests for `SqliteStore` against an in-memory database.

use counsel_core::{
  document::{DocumentReplacement, NewDocument},
  inquiry::NewInquiry,
  store::PortalStore,
  user::{NewUser, PracticeArea, ProfileUpdate, UserUpdate},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str) -> NewUser {
  NewUser {
    name:          "Alice Liddell".into(),
    email:         email.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    contact:       "1234567890".into(),
    is_admin:      false,
    practice_area: PracticeArea::Others,
  }
}

fn new_document(user_id: Uuid, payload: &[u8]) -> NewDocument {
  NewDocument {
    user_id,
    name: "Retainer agreement".into(),
    file_name: "retainer.pdf".into(),
    media_type: "application/pdf".into(),
    payload: payload.to_vec(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  assert_eq!(user.email, "alice@example.com");
  assert_eq!(user.practice_area, PracticeArea::Others);
  assert!(!user.is_admin);

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.name, "Alice Liddell");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_user(new_user("alice@example.com")).await.unwrap();

  let err = s
    .create_user(new_user("alice@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken(_)));
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_users_empty_is_success() {
  let s = store().await;
  assert!(s.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn credentials_carry_the_stored_hash() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let creds = s
    .find_credentials_by_email("alice@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.user.user_id, user.user_id);
  assert!(creds.password_hash.starts_with("$argon2id$"));

  let by_id = s.get_user_credentials(user.user_id).await.unwrap().unwrap();
  assert_eq!(by_id.password_hash, creds.password_hash);
}

#[tokio::test]
async fn update_user_changes_all_admin_fields() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let updated = s
    .update_user(
      user.user_id,
      UserUpdate {
        name:          "Alice Kingsleigh".into(),
        email:         "alice@wonder.example".into(),
        contact:       "0987654321".into(),
        practice_area: PracticeArea::EstatePlanning,
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.name, "Alice Kingsleigh");
  assert_eq!(updated.email, "alice@wonder.example");
  assert_eq!(updated.practice_area, PracticeArea::EstatePlanning);
  assert!(updated.updated_at >= user.updated_at);
}

#[tokio::test]
async fn update_user_email_collision_is_rejected() {
  let s = store().await;
  s.create_user(new_user("taken@example.com")).await.unwrap();
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let err = s
    .update_user(
      user.user_id,
      UserUpdate {
        name:          user.name.clone(),
        email:         "taken@example.com".into(),
        contact:       user.contact.clone(),
        practice_area: user.practice_area,
      },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken(_)));
}

#[tokio::test]
async fn update_user_keeping_own_email_is_fine() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let updated = s
    .update_user(
      user.user_id,
      UserUpdate {
        name:          "Renamed".into(),
        email:         "alice@example.com".into(),
        contact:       user.contact.clone(),
        practice_area: user.practice_area,
      },
    )
    .await
    .unwrap();
  assert_eq!(updated.name, "Renamed");
}

#[tokio::test]
async fn update_missing_user_fails() {
  let s = store().await;
  let err = s
    .update_user(
      Uuid::new_v4(),
      UserUpdate {
        name:          "X".into(),
        email:         "x@example.com".into(),
        contact:       "1234567890".into(),
        practice_area: PracticeArea::Others,
      },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
}

#[tokio::test]
async fn profile_update_can_change_password_but_not_role() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let updated = s
    .update_profile(
      user.user_id,
      ProfileUpdate {
        name:              user.name.clone(),
        email:             user.email.clone(),
        contact:           "1112223333".into(),
        new_password_hash: Some("$argon2id$v=19$new$hash".into()),
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.contact, "1112223333");
  assert!(!updated.is_admin);

  let creds = s.get_user_credentials(user.user_id).await.unwrap().unwrap();
  assert_eq!(creds.password_hash, "$argon2id$v=19$new$hash");
}

#[tokio::test]
async fn delete_user_cascades_to_documents() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  s.add_document(new_document(user.user_id, b"contents"))
    .await
    .unwrap();
  s.add_document(new_document(user.user_id, b"more"))
    .await
    .unwrap();

  s.delete_user(user.user_id).await.unwrap();

  assert!(s.get_user(user.user_id).await.unwrap().is_none());
  let docs = s.list_documents_for_user(user.user_id).await.unwrap();
  assert!(docs.is_empty());
  assert!(s.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_user_fails() {
  let s = store().await;
  let err = s.delete_user(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_payload_round_trips_exactly() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  // Every byte value, twice over, to exercise the base64 path.
  let payload: Vec<u8> = (0..=255u8).cycle().take(512).collect();
  let doc = s
    .add_document(new_document(user.user_id, &payload))
    .await
    .unwrap();

  let fetched = s.get_document(doc.document_id).await.unwrap().unwrap();
  assert_eq!(fetched.payload, payload);
  assert_eq!(fetched.file_name, "retainer.pdf");
  assert_eq!(fetched.media_type, "application/pdf");
}

#[tokio::test]
async fn document_requires_existing_owner() {
  let s = store().await;
  let err = s
    .add_document(new_document(Uuid::new_v4(), b"x"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
}

#[tokio::test]
async fn list_documents_resolves_owner_names() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  s.add_document(new_document(user.user_id, b"contents"))
    .await
    .unwrap();

  let all = s.list_documents().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].owner_name, "Alice Liddell");
  assert_eq!(all[0].document.user_id, user.user_id);
}

#[tokio::test]
async fn list_documents_for_user_empty_is_success() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  assert!(
    s.list_documents_for_user(user.user_id)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn replace_document_is_wholesale() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let doc = s
    .add_document(new_document(user.user_id, b"old"))
    .await
    .unwrap();

  let replaced = s
    .replace_document(
      doc.document_id,
      DocumentReplacement {
        file_name:  "retainer-v2.pdf".into(),
        media_type: "application/pdf".into(),
        payload:    b"new contents".to_vec(),
      },
    )
    .await
    .unwrap();

  assert_eq!(replaced.payload, b"new contents");
  assert_eq!(replaced.file_name, "retainer-v2.pdf");
  // Owner and display name are fixed.
  assert_eq!(replaced.user_id, user.user_id);
  assert_eq!(replaced.name, "Retainer agreement");
  assert!(replaced.uploaded_at >= doc.uploaded_at);
}

#[tokio::test]
async fn replace_missing_document_fails() {
  let s = store().await;
  let err = s
    .replace_document(
      Uuid::new_v4(),
      DocumentReplacement {
        file_name:  "f".into(),
        media_type: "text/plain".into(),
        payload:    b"x".to_vec(),
      },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DocumentNotFound(_)));
}

#[tokio::test]
async fn delete_document_is_permanent() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let doc = s
    .add_document(new_document(user.user_id, b"contents"))
    .await
    .unwrap();

  s.delete_document(doc.document_id).await.unwrap();
  assert!(s.get_document(doc.document_id).await.unwrap().is_none());

  let err = s.delete_document(doc.document_id).await.unwrap_err();
  assert!(matches!(err, Error::DocumentNotFound(_)));
}

// ─── Inquiries ───────────────────────────────────────────────────────────────

fn new_inquiry(first_name: &str) -> NewInquiry {
  NewInquiry {
    first_name:  first_name.into(),
    last_name:   "Smith".into(),
    email:       "visitor@example.com".into(),
    phone:       "5551234567".into(),
    matter_type: "Family Law".into(),
    message:     "I would like a consultation.".into(),
  }
}

#[tokio::test]
async fn inquiries_list_newest_first() {
  let s = store().await;
  s.add_inquiry(new_inquiry("First")).await.unwrap();
  s.add_inquiry(new_inquiry("Second")).await.unwrap();
  s.add_inquiry(new_inquiry("Third")).await.unwrap();

  let all = s.list_inquiries().await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all[0].submitted_at >= all[1].submitted_at);
  assert!(all[1].submitted_at >= all[2].submitted_at);
}

#[tokio::test]
async fn inquiries_empty_list_is_success() {
  let s = store().await;
  assert!(s.list_inquiries().await.unwrap().is_empty());
}
