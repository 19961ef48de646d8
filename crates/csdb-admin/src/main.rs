//! csdb-admin server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `CSDB_*` environment variables on top, opens the SQLite catalogue and
//! serves the admin API over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use csdb_admin::{AdminConfig, AppState};
use csdb_core::view::{DEFAULT_PAGE_SIZE, DEFAULT_SITE_HEADER};
use csdb_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cultural studies catalogue admin server")]
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
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8000_i64)?
    .set_default("store_path", "~/.local/share/csdb/catalogue.sqlite3")?
    .set_default("site_header", DEFAULT_SITE_HEADER)?
    .set_default("page_size", DEFAULT_PAGE_SIZE as i64)?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CSDB"))
    .build()
    .context("failed to read config file")?;

  let admin_cfg: AdminConfig = settings
    .try_deserialize()
    .context("failed to deserialise AdminConfig")?;

  let store_path = expand_tilde(&admin_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "opened catalogue");

  let address = format!("{}:{}", admin_cfg.host, admin_cfg.port);
  let app = csdb_admin::router(AppState::new(store, admin_cfg));

  tracing::info!("Listening on http://{address}/admin/");
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
