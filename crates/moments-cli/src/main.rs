//! `moments` command-line journal.
//!
//! Reads `moments.toml` (or the path given with `--config`), opens the SQLite
//! store and runs one command against it.
//!
//! ```text
//! moments add --companion Sam --location Home --pleasure 8 --comfort 7 --audacity 5
//! moments list
//! moments stats
//! ```

mod commands;
mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use moments_core::store::MomentStore as _;
use moments_store_sqlite::{SqlitePreferences, SqliteStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{commands::JournalCommand, config::AppConfig};

#[derive(Parser)]
#[command(author, version, about = "Private journal of intimate moments")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "moments.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  #[command(flatten)]
  Journal(JournalCommand),

  /// Show the theme preference.
  Theme {
    /// Switch between dark and light before printing.
    #[arg(long)]
    toggle: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  match cli.command {
    Command::Theme { toggle } => {
      let path = cfg.preferences_path();
      let prefs = SqlitePreferences::open(&path)
        .await
        .with_context(|| format!("failed to open preferences at {}", path.display()))?;
      commands::theme(Arc::new(prefs), toggle).await
    }
    Command::Journal(command) => {
      let path = cfg.store_path();
      let store = SqliteStore::new(&path);
      store
        .initialize()
        .await
        .with_context(|| format!("failed to open store at {}", path.display()))?;
      tracing::debug!(path = %path.display(), "store ready");

      let store = Arc::new(store);
      let result = commands::journal(command, store.clone()).await;
      if let Err(err) = store.close().await {
        tracing::warn!(error = %err, "failed to close store");
      }
      result
    }
  }
}
