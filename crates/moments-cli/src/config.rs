//! Runtime configuration, layered from an optional TOML file and `MOMENTS_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
  /// SQLite file holding the moments table.
  pub store_path:       PathBuf,
  /// SQLite file holding the preferences table; defaults to `store_path`.
  #[serde(default)]
  pub preferences_path: Option<PathBuf>,
}

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "moments.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MOMENTS"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn preferences_path(&self) -> PathBuf {
    expand_tilde(self.preferences_path.as_ref().unwrap_or(&self.store_path))
  }
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
