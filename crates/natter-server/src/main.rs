//! natter server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `NATTER_*` environment variables on top, opens the SQLite store, and serves
//! the JSON API over HTTP.
//!
//! # Encrypting a message body
//!
//! Messages are stored encrypted with the configured secret. To produce a
//! ciphertext by hand, e.g. for seeding a database:
//!
//! ```
//! cargo run -p natter-server -- --encrypt
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use natter_api::{AppState, ServerConfig};
use natter_core::cipher::{AesCipher, MessageCipher};
use natter_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Natter messaging backend")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Encrypt a line read from stdin with the configured secret, print the
  /// ciphertext and exit.
  #[arg(long)]
  encrypt: bool,
}

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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("NATTER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Helper mode: encrypt a message body and exit.
  if cli.encrypt {
    let line = read_stdin_line()?;
    let sealed = AesCipher::new(&server_cfg.cipher_secret)
      .encrypt(&line)
      .context("failed to encrypt")?;
    println!("{sealed}");
    return Ok(());
  }

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState::new(store, &server_cfg);
  let app = natter_api::router(state)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read one line from stdin, without the trailing newline.
fn read_stdin_line() -> anyhow::Result<String> {
  use std::io::{self, BufRead};
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_tilde_leaves_plain_paths() {
    assert_eq!(expand_tilde(Path::new("/var/natter.db")), PathBuf::from("/var/natter.db"));
    assert_eq!(expand_tilde(Path::new("natter.db")), PathBuf::from("natter.db"));
  }

  #[test]
  fn cli_defaults() {
    let cli = Cli::parse_from(["natter"]);
    assert_eq!(cli.config, PathBuf::from("config.toml"));
    assert!(!cli.encrypt);
  }
}
