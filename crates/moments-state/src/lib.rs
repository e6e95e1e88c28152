//! Observable application state for the Moments journal.
//!
//! Two independent containers sit between a front end and the stores:
//! [`MomentsContainer`] caches the moment list and re-fetches after every
//! mutation; [`SettingsContainer`] holds the theme preference.

mod moments;
mod observable;
mod settings;

pub use moments::{MomentsContainer, MomentsState};
pub use observable::Observable;
pub use settings::{SettingsContainer, SettingsState, THEME_KEY};
