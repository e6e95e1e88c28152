//! [`SqlitePreferences`]: a string key-value store in a SQLite table.

use std::path::Path;

use rusqlite::OptionalExtension as _;

use moments_core::store::PreferenceStore;

use crate::{Error, Result, schema::PREFERENCES_SCHEMA};

/// Key-value preferences persisted in a `preferences` table.
///
/// May share a database file with [`SqliteStore`](crate::SqliteStore).
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqlitePreferences {
  conn: tokio_rusqlite::Connection,
}

impl SqlitePreferences {
  /// Open (or create) the preference table in the database at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::StorageUnavailable)?;
    Self::init(conn).await
  }

  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::StorageUnavailable)?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(PREFERENCES_SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::StorageUnavailable)?;
    Ok(Self { conn })
  }
}

impl PreferenceStore for SqlitePreferences {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    let key = key.to_owned();
    let value = value.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO preferences (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
