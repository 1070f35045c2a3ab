//! counsel-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the portal API over HTTP.
//!
//! # Password hash generation
//!
//! Registration only creates client accounts; administrator rows are seeded
//! directly in the database. To generate the argon2 PHC string for such a
//! row:
//!
//! ```text
//! counsel-server --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::http::{HeaderValue, Method, header};
use clap::Parser;
use counsel_api::{
  AppState, AuthConfig,
  auth::SameSite,
};
use counsel_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Counsel portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Full server configuration: TOML file plus `COUNSEL_*` env overrides.
#[derive(Clone, Deserialize)]
struct ServerConfig {
  host:             String,
  port:             u16,
  database_path:    PathBuf,
  /// Secret for session token signing. Keep it out of version control.
  token_secret:     String,
  /// Browser origins allowed to call the API with credentials. Empty means
  /// no CORS layer (same-origin deployments).
  #[serde(default)]
  allowed_origins:  Vec<String>,
  #[serde(default = "default_cookie_secure")]
  cookie_secure:    bool,
  #[serde(default = "default_same_site")]
  cookie_same_site: SameSite,
}

fn default_cookie_secure() -> bool { true }
fn default_same_site() -> SameSite { SameSite::None }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password_from_stdin()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("COUNSEL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.token_secret.len() < 16 {
    anyhow::bail!("token_secret must be at least 16 bytes");
  }

  // Expand `~` in the database path.
  let database_path = expand_tilde(&server_cfg.database_path);

  // Open SQLite store.
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;

  // Build application state.
  let state = AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig {
      token_secret:     server_cfg.token_secret.clone(),
      cookie_secure:    server_cfg.cookie_secure,
      cookie_same_site: server_cfg.cookie_same_site,
    }),
  };

  let mut app =
    counsel_api::router(state).layer(TraceLayer::new_for_http());
  if let Some(cors) = cors_layer(&server_cfg.allowed_origins)? {
    app = app.layer(cors);
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

/// Credentialed CORS for the configured browser origins; `None` when the
/// origin list is empty.
fn cors_layer(origins: &[String]) -> anyhow::Result<Option<CorsLayer>> {
  if origins.is_empty() {
    return Ok(None);
  }

  let origins = origins
    .iter()
    .map(|origin| {
      origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid allowed origin {origin:?}"))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  Ok(Some(
    CorsLayer::new()
      .allow_origin(origins)
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
      ])
      .allow_headers([header::CONTENT_TYPE])
      // Cookies cross origins only with explicit credential support.
      .allow_credentials(true),
  ))
}

/// Resolve on ctrl-c or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c()
      .await
      .expect("failed to install ctrl-c handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("failed to install SIGTERM handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }

  tracing::info!("shutdown signal received");
}

/// Read a password from stdin.
fn read_password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
