//! scribe server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `SCRIBE_*` environment variables over it, opens the SQLite store and serves
//! the blog over HTTP.
//!
//! ```text
//! cargo run -p scribe-web --bin server -- --config config.toml
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use scribe_core::store::BlogStore as _;
use scribe_store_sqlite::SqliteStore;
use scribe_web::{AppState, ServerConfig, templates::Templates};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "scribe blog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SCRIBE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate().context("invalid configuration")?;

  let database_path = expand_tilde(&server_cfg.database_path);
  if let Some(parent) = database_path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open database at {database_path:?}"))?;

  let purged = store
    .purge_expired_sessions(Utc::now())
    .await
    .context("failed to purge expired sessions")?;
  if purged > 0 {
    tracing::info!(purged, "removed expired sessions");
  }

  let templates = Templates::load().context("failed to load templates")?;

  let state = AppState {
    store:     Arc::new(store),
    config:    Arc::new(server_cfg.clone()),
    templates: Arc::new(templates),
  };

  let app = scribe_web::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
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
