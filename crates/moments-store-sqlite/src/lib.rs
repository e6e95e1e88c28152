//! SQLite backend for the Moments journal.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod preferences;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use preferences::SqlitePreferences;
pub use store::SqliteStore;
