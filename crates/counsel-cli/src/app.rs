//! Application state machine and event dispatcher.
//!
//! Session flow: `Login` until the API accepts the credentials, then `Main`
//! with a view set gated on the account's role. Logging out drops every
//! snapshot and returns to `Login`.

use std::sync::Arc;

use counsel_core::{
  document::{Document, DocumentWithOwner},
  inquiry::Inquiry,
  user::User,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
  cache::Snapshot,
  client::ApiClient,
  listing::{self, ListState},
};

// ─── Screen and views ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Login,
  Main,
}

/// One tab of the main screen. The available set depends on the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Clients,
  Documents,
  Inquiries,
  MyDocuments,
  Profile,
}

impl View {
  pub fn title(self) -> &'static str {
    match self {
      View::Clients => "Clients",
      View::Documents => "Documents",
      View::Inquiries => "Inquiries",
      View::MyDocuments => "My documents",
      View::Profile => "Profile",
    }
  }

  /// Column headers, in the order the sort keys `1..` address them.
  pub fn columns(self) -> &'static [&'static str] {
    match self {
      View::Clients => &["Name", "Email", "Contact", "Practice area"],
      View::Documents => &["Name", "Owner", "Filename", "Uploaded"],
      View::Inquiries => &["Name", "Email", "Matter", "Submitted"],
      View::MyDocuments => &["Name", "Filename", "Type", "Uploaded"],
      View::Profile => &[],
    }
  }
}

fn views_for(user: &User) -> Vec<View> {
  if user.is_admin {
    vec![View::Clients, View::Documents, View::Inquiries, View::Profile]
  } else {
    vec![View::MyDocuments, View::Profile]
  }
}

// ─── Column projections ──────────────────────────────────────────────────────
//
// Shared by the list pipeline and the table renderer so search, sort, and
// display all agree on the cell text.

pub fn user_columns(user: &User) -> Vec<String> {
  vec![
    user.name.clone(),
    user.email.clone(),
    user.contact.clone(),
    user.practice_area.to_string(),
  ]
}

pub fn document_columns(doc: &DocumentWithOwner) -> Vec<String> {
  vec![
    doc.document.name.clone(),
    doc.owner_name.clone(),
    doc.document.file_name.clone(),
    doc.document.uploaded_at.format("%Y-%m-%d").to_string(),
  ]
}

pub fn own_document_columns(doc: &Document) -> Vec<String> {
  vec![
    doc.name.clone(),
    doc.file_name.clone(),
    doc.media_type.clone(),
    doc.uploaded_at.format("%Y-%m-%d").to_string(),
  ]
}

pub fn inquiry_columns(inquiry: &Inquiry) -> Vec<String> {
  vec![
    format!("{} {}", inquiry.first_name, inquiry.last_name),
    inquiry.email.clone(),
    inquiry.matter_type.clone(),
    inquiry.submitted_at.format("%Y-%m-%d").to_string(),
  ]
}

// ─── Login form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  Email,
  Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
  pub email:    String,
  pub password: String,
  pub focus:    LoginField,
}

impl Default for LoginField {
  fn default() -> Self {
    LoginField::Email
  }
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  /// The logged-in account; `None` on the login screen.
  pub session: Option<User>,

  pub login: LoginForm,

  /// Role-gated tab set; populated at login.
  pub views:  Vec<View>,
  pub active: usize,

  // One snapshot and one interaction state per collection view.
  pub clients:           Snapshot<User>,
  pub documents:         Snapshot<DocumentWithOwner>,
  pub my_documents:      Snapshot<Document>,
  pub inquiries:         Snapshot<Inquiry>,
  pub clients_list:      ListState,
  pub documents_list:    ListState,
  pub my_documents_list: ListState,
  pub inquiries_list:    ListState,

  /// Whether the user is typing a search term.
  pub search_active: bool,

  /// Terminal width, tracked for the page-size breakpoints.
  pub viewport_width: u16,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::Login,
      session: None,
      login: LoginForm::default(),
      views: Vec::new(),
      active: 0,
      clients: Snapshot::default(),
      documents: Snapshot::default(),
      my_documents: Snapshot::default(),
      inquiries: Snapshot::default(),
      clients_list: ListState::default(),
      documents_list: ListState::default(),
      my_documents_list: ListState::default(),
      inquiries_list: ListState::default(),
      search_active: false,
      viewport_width: 80,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  pub fn active_view(&self) -> Option<View> {
    self.views.get(self.active).copied()
  }

  pub fn page_size(&self) -> usize {
    listing::page_size(self.viewport_width)
  }

  fn active_list_mut(&mut self) -> Option<&mut ListState> {
    match self.active_view()? {
      View::Clients => Some(&mut self.clients_list),
      View::Documents => Some(&mut self.documents_list),
      View::Inquiries => Some(&mut self.inquiries_list),
      View::MyDocuments => Some(&mut self.my_documents_list),
      View::Profile => None,
    }
  }

  pub fn active_list(&self) -> Option<&ListState> {
    match self.active_view()? {
      View::Clients => Some(&self.clients_list),
      View::Documents => Some(&self.documents_list),
      View::Inquiries => Some(&self.inquiries_list),
      View::MyDocuments => Some(&self.my_documents_list),
      View::Profile => None,
    }
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// Attempt a login with the current form contents.
  pub async fn submit_login(&mut self) -> anyhow::Result<()> {
    if self.login.email.is_empty() || self.login.password.is_empty() {
      self.status_msg = "Email and password are required".into();
      return Ok(());
    }

    self.status_msg = "Signing in…".into();
    match self.client.login(&self.login.email, &self.login.password).await {
      Ok(user) => {
        self.views = views_for(&user);
        self.session = Some(user);
        self.active = 0;
        self.screen = Screen::Main;
        self.login.password.clear();
        self.status_msg = String::new();
        self.ensure_loaded().await;
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Login failed: {e}");
        Ok(())
      }
    }
  }

  async fn logout(&mut self) {
    if let Err(e) = self.client.logout().await {
      self.status_msg = format!("Logout: {e}");
    } else {
      self.status_msg = "Signed out".into();
    }
    self.session = None;
    self.views.clear();
    self.active = 0;
    self.clients.invalidate();
    self.documents.invalidate();
    self.my_documents.invalidate();
    self.inquiries.invalidate();
    self.clients_list = ListState::default();
    self.documents_list = ListState::default();
    self.my_documents_list = ListState::default();
    self.inquiries_list = ListState::default();
    self.search_active = false;
    self.screen = Screen::Login;
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the active view's collection if its snapshot is stale.
  pub async fn ensure_loaded(&mut self) {
    let Some(view) = self.active_view() else { return };
    let result = match view {
      View::Clients if self.clients.is_stale() => {
        match self.client.list_users().await {
          Ok(rows) => {
            self.clients.fill(rows);
            Ok(())
          }
          Err(e) => Err(e),
        }
      }
      View::Documents if self.documents.is_stale() => {
        match self.client.all_documents().await {
          Ok(rows) => {
            self.documents.fill(rows);
            Ok(())
          }
          Err(e) => Err(e),
        }
      }
      View::Inquiries if self.inquiries.is_stale() => {
        match self.client.list_inquiries().await {
          Ok(rows) => {
            self.inquiries.fill(rows);
            Ok(())
          }
          Err(e) => Err(e),
        }
      }
      View::MyDocuments if self.my_documents.is_stale() => {
        let user_id = match &self.session {
          Some(user) => user.user_id,
          None => return,
        };
        match self.client.documents_for_user(user_id).await {
          Ok(rows) => {
            self.my_documents.fill(rows);
            Ok(())
          }
          Err(e) => Err(e),
        }
      }
      View::Profile => {
        // Always refetch so profile edits made elsewhere show up.
        let user_id = match &self.session {
          Some(user) => user.user_id,
          None => return,
        };
        match self.client.get_user(user_id).await {
          Ok(user) => {
            self.session = Some(user);
            Ok(())
          }
          Err(e) => Err(e),
        }
      }
      _ => Ok(()),
    };

    if let Err(e) = result {
      self.status_msg = format!("Error: {e}");
    }
  }

  /// Drop the active snapshot and refetch.
  async fn refresh(&mut self) {
    match self.active_view() {
      Some(View::Clients) => self.clients.invalidate(),
      Some(View::Documents) => self.documents.invalidate(),
      Some(View::Inquiries) => self.inquiries.invalidate(),
      Some(View::MyDocuments) => self.my_documents.invalidate(),
      _ => {}
    }
    self.ensure_loaded().await;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return Ok(false);
    }

    match self.screen {
      Screen::Login => self.handle_login_key(key).await,
      Screen::Main if self.search_active => {
        self.handle_search_key(key);
        Ok(true)
      }
      Screen::Main => self.handle_main_key(key).await,
    }
  }

  async fn handle_login_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Tab | KeyCode::BackTab => {
        self.login.focus = match self.login.focus {
          LoginField::Email => LoginField::Password,
          LoginField::Password => LoginField::Email,
        };
      }
      KeyCode::Enter => match self.login.focus {
        LoginField::Email => self.login.focus = LoginField::Password,
        LoginField::Password => self.submit_login().await?,
      },
      KeyCode::Backspace => {
        match self.login.focus {
          LoginField::Email => self.login.email.pop(),
          LoginField::Password => self.login.password.pop(),
        };
      }
      KeyCode::Char(c) => match self.login.focus {
        LoginField::Email => self.login.email.push(c),
        LoginField::Password => self.login.password.push(c),
      },
      _ => {}
    }
    Ok(true)
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    if self.active_list().is_none() {
      self.search_active = false;
      return;
    }
    match key.code {
      KeyCode::Esc => {
        if let Some(list) = self.active_list_mut() {
          list.set_search("");
        }
        self.search_active = false;
      }
      KeyCode::Enter => self.search_active = false,
      KeyCode::Backspace => {
        if let Some(list) = self.active_list_mut() {
          let mut term = list.search.clone();
          term.pop();
          list.set_search(term);
        }
      }
      KeyCode::Char(c) => {
        if let Some(list) = self.active_list_mut() {
          let mut term = list.search.clone();
          term.push(c);
          list.set_search(term);
        }
      }
      _ => {}
    }
  }

  async fn handle_main_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // View cycling.
      KeyCode::Tab => {
        if !self.views.is_empty() {
          self.active = (self.active + 1) % self.views.len();
          self.ensure_loaded().await;
        }
      }
      KeyCode::BackTab => {
        if !self.views.is_empty() {
          self.active =
            (self.active + self.views.len() - 1) % self.views.len();
          self.ensure_loaded().await;
        }
      }

      // Search.
      KeyCode::Char('/') => {
        if self.active_list().is_some() {
          self.search_active = true;
        }
      }

      // Pagination.
      KeyCode::Right | KeyCode::Char('l') => {
        if let Some(list) = self.active_list_mut() {
          list.next_page();
        }
      }
      KeyCode::Left | KeyCode::Char('h') => {
        if let Some(list) = self.active_list_mut() {
          list.prev_page();
        }
      }

      // Sort: digit keys address columns left to right.
      KeyCode::Char(c @ '1'..='9') => {
        let columns =
          self.active_view().map(|v| v.columns().len()).unwrap_or(0);
        let column = c as usize - '1' as usize;
        if column < columns
          && let Some(list) = self.active_list_mut()
        {
          list.toggle_sort(column);
        }
      }

      // Refresh and session.
      KeyCode::Char('r') => self.refresh().await,
      KeyCode::Char('o') => self.logout().await,

      _ => {}
    }
    Ok(true)
  }
}
