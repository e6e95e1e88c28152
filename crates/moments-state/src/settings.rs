//! [`SettingsContainer`]: the persisted dark-mode preference.

use std::sync::Arc;

use moments_core::store::PreferenceStore;
use tokio::sync::watch;

use crate::Observable;

/// Preference key holding the dark-mode flag as a JSON boolean.
pub const THEME_KEY: &str = "@moments_theme_mode";

const DEFAULT_DARK_MODE: bool = true;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
  pub is_dark_mode: bool,
  pub is_loading:   bool,
  /// Set when the last toggle could not be persisted: the in-memory value
  /// differs from the stored one until a later save succeeds.
  pub unsaved:      bool,
}

impl Default for SettingsState {
  fn default() -> Self {
    Self { is_dark_mode: DEFAULT_DARK_MODE, is_loading: false, unsaved: false }
  }
}

pub struct SettingsContainer<P> {
  prefs: Arc<P>,
  state: Observable<SettingsState>,
}

impl<P: PreferenceStore> SettingsContainer<P> {
  pub fn new(prefs: Arc<P>) -> Self {
    Self { prefs, state: Observable::default() }
  }

  pub fn state(&self) -> SettingsState { self.state.get() }

  pub fn is_dark_mode(&self) -> bool { self.state.borrow().is_dark_mode }

  pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
    self.state.subscribe()
  }

  /// Read the saved preference; an unset key means dark mode.
  ///
  /// Failures are logged and leave the current value in place.
  pub async fn load(&self) {
    self.state.update(|s| s.is_loading = true);

    let saved = match self.prefs.get(THEME_KEY).await {
      Ok(saved) => saved,
      Err(err) => {
        tracing::error!(error = %err, "failed to load settings");
        self.state.update(|s| s.is_loading = false);
        return;
      }
    };

    match saved.as_deref().map(serde_json::from_str::<bool>).transpose() {
      Ok(is_dark) => self.state.update(|s| {
        s.is_dark_mode = is_dark.unwrap_or(DEFAULT_DARK_MODE);
        s.is_loading = false;
      }),
      Err(err) => {
        tracing::error!(error = %err, ?saved, "stored theme preference is not a boolean");
        self.state.update(|s| s.is_loading = false);
      }
    }
  }

  /// Flip the preference and persist it. Returns the new value.
  ///
  /// The in-memory flip is kept even if persisting fails; `unsaved` records
  /// the divergence.
  pub async fn toggle(&self) -> bool {
    let is_dark = !self.state.borrow().is_dark_mode;
    self.state.update(|s| s.is_dark_mode = is_dark);

    let raw = serde_json::Value::Bool(is_dark).to_string();
    match self.prefs.set(THEME_KEY, &raw).await {
      Ok(()) => self.state.update(|s| s.unsaved = false),
      Err(err) => {
        tracing::error!(error = %err, "failed to save theme");
        self.state.update(|s| s.unsaved = true);
      }
    }
    is_dark
  }
}
