//! `counsel` — terminal client for the Counsel portal.
//!
//! # Usage
//!
//! ```text
//! counsel --url http://localhost:4000 --email admin@firm.example --password secret
//! counsel --config ~/.config/counsel/config.toml
//! counsel register --name "Casey Client" --email casey@example.com \
//!   --password hunter2hunter2 --contact 5551234567
//! counsel upload --user <uuid> --name "Retainer" retainer.pdf
//! ```
//!
//! Without a subcommand the interactive browser opens; subcommands run one
//! API call and exit.

mod app;
mod cache;
mod client;
mod listing;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use app::App;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, ProfileChange};
use counsel_core::user::PracticeArea;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "counsel", about = "Terminal client for the Counsel portal")]
struct Args {
  /// Path to a TOML config file (url, email, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the portal server (default: http://localhost:4000).
  #[arg(long, env = "COUNSEL_URL")]
  url: Option<String>,

  /// Account email, for sign-in.
  #[arg(long, env = "COUNSEL_EMAIL")]
  email: Option<String>,

  /// Account password (plaintext).
  #[arg(long, env = "COUNSEL_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a client account. No sign-in required.
  Register {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    email:    String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    contact:  String,
  },

  /// Submit a public consultation request. No sign-in required.
  Inquire {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name:  String,
    #[arg(long)]
    email:      String,
    #[arg(long)]
    phone:      String,
    #[arg(long)]
    matter:     String,
    #[arg(long)]
    message:    String,
  },

  /// Upload a document for a user.
  Upload {
    #[arg(long)]
    user: Uuid,
    #[arg(long)]
    name: String,
    file: PathBuf,
  },

  /// Replace a document's file, keeping its display name and owner.
  Replace {
    #[arg(long)]
    document: Uuid,
    file:     PathBuf,
  },

  /// Delete a document permanently.
  DeleteDocument { document: Uuid },

  /// Update a client record (administrators only).
  UpdateClient {
    #[arg(long)]
    id:      Uuid,
    #[arg(long)]
    name:    String,
    #[arg(long)]
    email:   String,
    #[arg(long)]
    contact: String,
    /// Practice area, e.g. "Family Law".
    #[arg(long)]
    area:    String,
  },

  /// Update your own profile; pass both password flags to change it.
  UpdateProfile {
    #[arg(long)]
    id:               Uuid,
    #[arg(long)]
    name:             String,
    #[arg(long)]
    email:            String,
    #[arg(long)]
    contact:          String,
    #[arg(long)]
    current_password: Option<String>,
    #[arg(long)]
    new_password:     Option<String>,
  },

  /// Delete a client account and their documents (administrators only).
  DeleteClient { id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  email:    String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .clone()
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:4000".to_string());
  let email = args
    .email
    .clone()
    .or_else(|| (!file_cfg.email.is_empty()).then(|| file_cfg.email.clone()))
    .unwrap_or_default();
  let password = args
    .password
    .clone()
    .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
    .unwrap_or_default();

  let client = ApiClient::new(ApiConfig { base_url })?;

  match args.command {
    Some(command) => run_command(client, command, &email, &password).await,
    None => run_tui(client, email, password).await,
  }
}

// ─── One-shot commands ────────────────────────────────────────────────────────

async fn run_command(
  client: ApiClient,
  command: Command,
  email: &str,
  password: &str,
) -> Result<()> {
  // Everything except registration and inquiries runs inside a session.
  let needs_session =
    !matches!(command, Command::Register { .. } | Command::Inquire { .. });
  if needs_session {
    if email.is_empty() || password.is_empty() {
      bail!("this command requires --email and --password (or a config file)");
    }
    client.login(email, password).await?;
  }

  match command {
    Command::Register { name, email, password, contact } => {
      let user = client.register(&name, &email, &password, &contact).await?;
      println!("Registered {} <{}> ({})", user.name, user.email, user.user_id);
    }
    Command::Inquire {
      first_name,
      last_name,
      email,
      phone,
      matter,
      message,
    } => {
      let inquiry = client
        .submit_inquiry(&first_name, &last_name, &email, &phone, &matter, &message)
        .await?;
      println!("Submitted consultation request {}", inquiry.inquiry_id);
    }
    Command::Upload { user, name, file } => {
      let document = client.upload_document(user, &name, &file).await?;
      println!(
        "Uploaded {} as {} ({})",
        document.file_name, document.name, document.document_id
      );
    }
    Command::Replace { document, file } => {
      let document = client.replace_document(document, &file).await?;
      println!("Replaced {} ({})", document.file_name, document.document_id);
    }
    Command::DeleteDocument { document } => {
      client.delete_document(document).await?;
      println!("Deleted document {document}");
    }
    Command::UpdateClient { id, name, email, contact, area } => {
      let area: PracticeArea = area
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown practice area {area:?}"))?;
      let user = client.update_user(id, &name, &email, &contact, area).await?;
      println!("Updated {} <{}>", user.name, user.email);
    }
    Command::UpdateProfile {
      id,
      name,
      email,
      contact,
      current_password,
      new_password,
    } => {
      let user = client
        .update_profile(
          id,
          &ProfileChange { name, email, contact, current_password, new_password },
        )
        .await?;
      println!("Updated profile for {} <{}>", user.name, user.email);
    }
    Command::DeleteClient { id } => {
      client.delete_user(id).await?;
      println!("Deleted user {id}");
    }
  }

  if needs_session {
    client.logout().await.ok();
  }
  Ok(())
}

// ─── Interactive browser ──────────────────────────────────────────────────────

async fn run_tui(
  client: ApiClient,
  email: String,
  password: String,
) -> Result<()> {
  let mut app = App::new(client);
  app.login.email = email;
  app.login.password = password;

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.viewport_width = terminal.size().map(|s| s.width).unwrap_or(80);

  // Credentials supplied up front: sign in before the first frame.
  if !app.login.email.is_empty() && !app.login.password.is_empty() {
    app.submit_login().await.ok();
  }

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(width, _) => {
          // Page size tracks the new width on the next draw.
          app.viewport_width = width;
        }
        _ => {}
      }
    }
  }

  Ok(())
}
