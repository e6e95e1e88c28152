//! [`SqliteStore`]: the SQLite implementation of [`MomentStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::RwLock;

use moments_core::{
  moment::{Moment, MomentId, MomentPatch, NewMoment},
  stats::{LocationCount, Statistics, TOP_LOCATIONS},
  store::MomentStore,
};

use crate::{
  Error, Result,
  encode::{RawMoment, SELECT_MOMENTS, encode_dt, encode_patch},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Target {
  File(PathBuf),
  Memory,
}

/// A moment store backed by a single SQLite file.
///
/// Constructing a store does not touch the disk; call
/// [`initialize`](MomentStore::initialize) first. Share it between callers
/// with an `Arc`.
pub struct SqliteStore {
  target: Target,
  conn:   RwLock<Option<tokio_rusqlite::Connection>>,
}

impl SqliteStore {
  /// A store that will open (or create) the database file at `path`.
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      target: Target::File(path.as_ref().to_path_buf()),
      conn:   RwLock::new(None),
    }
  }

  /// A store over a private in-memory database.
  pub fn in_memory() -> Self {
    Self { target: Target::Memory, conn: RwLock::new(None) }
  }

  /// Construct and initialise a file-backed store in one step.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self::new(path);
    store.initialize().await?;
    Ok(store)
  }

  /// Construct and initialise an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let store = Self::in_memory();
    store.initialize().await?;
    Ok(store)
  }

  /// A handle to the open connection, or [`Error::NotInitialized`].
  pub(crate) async fn conn(&self) -> Result<tokio_rusqlite::Connection> {
    self.conn.read().await.clone().ok_or(Error::NotInitialized)
  }

  async fn connect(&self) -> Result<tokio_rusqlite::Connection> {
    let conn = match &self.target {
      Target::File(path) => tokio_rusqlite::Connection::open(path).await,
      Target::Memory => tokio_rusqlite::Connection::open_in_memory().await,
    };
    conn.map_err(Error::StorageUnavailable)
  }
}

// ─── MomentStore impl ────────────────────────────────────────────────────────

impl MomentStore for SqliteStore {
  type Error = Error;

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn initialize(&self) -> Result<()> {
    let mut slot = self.conn.write().await;

    let conn = match slot.as_ref() {
      Some(conn) => conn.clone(),
      None => self.connect().await?,
    };

    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::StorageUnavailable)?;

    if slot.is_none() {
      tracing::debug!(db = ?self.target, "opened moments store");
    }
    *slot = Some(conn);
    Ok(())
  }

  /// The slot is only cleared once the connection has closed, so a failed
  /// close leaves the store usable.
  async fn close(&self) -> Result<()> {
    let mut slot = self.conn.write().await;
    if let Some(conn) = slot.clone() {
      if let Err(err) = conn.close().await {
        tracing::warn!(db = ?self.target, error = %err, "failed to close moments store");
        return Err(Error::StorageIo(err));
      }
      *slot = None;
      tracing::debug!(db = ?self.target, "closed moments store");
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_all(&self) -> Result<Vec<Moment>> {
    let conn = self.conn().await?;

    let raws: Vec<RawMoment> = conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_MOMENTS} ORDER BY date DESC, createdAt DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawMoment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMoment::into_moment).collect()
  }

  async fn get_by_id(&self, id: MomentId) -> Result<Option<Moment>> {
    let conn = self.conn().await?;

    let raw: Option<RawMoment> = conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_MOMENTS} WHERE id = ?1"),
              rusqlite::params![id],
              RawMoment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMoment::into_moment).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, input: NewMoment) -> Result<MomentId> {
    let conn = self.conn().await?;
    input.validate()?;

    let date_str       = encode_dt(input.date);
    let created_at_str = encode_dt(Utc::now());
    let to_renew       = input.to_renew.map(|r| r.as_str());

    let id = conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO moments (
             title, location, context, date, companion,
             pleasureRating, comfortRating, audacityRating,
             topTags, flopTags, personalNotes, toRenew, createdAt
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            input.title,
            input.location,
            input.context,
            date_str,
            input.companion,
            input.pleasure_rating,
            input.comfort_rating,
            input.audacity_rating,
            input.top_tags,
            input.flop_tags,
            input.personal_notes,
            to_renew,
            created_at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "created moment");
    Ok(id)
  }

  async fn update(&self, id: MomentId, patch: MomentPatch) -> Result<()> {
    let conn = self.conn().await?;
    if patch.is_empty() {
      return Ok(());
    }
    patch.validate()?;

    let assignments = encode_patch(patch);

    let changed = conn
      .call(move |conn| {
        let set_clause = assignments
          .iter()
          .map(|(column, _)| format!("{column} = ?"))
          .collect::<Vec<_>>()
          .join(", ");
        let sql = format!("UPDATE moments SET {set_clause} WHERE id = ?");

        let values = assignments
          .into_iter()
          .map(|(_, value)| value)
          .chain(std::iter::once(rusqlite::types::Value::Integer(id)));

        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id));
    }
    tracing::debug!(id, "updated moment");
    Ok(())
  }

  async fn delete(&self, id: MomentId) -> Result<()> {
    let conn = self.conn().await?;

    let removed = conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM moments WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    tracing::debug!(id, removed, "deleted moment");
    Ok(())
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn statistics(&self) -> Result<Statistics> {
    let conn = self.conn().await?;
    let limit = TOP_LOCATIONS as i64;

    // Both queries run in one call so no other statement lands between them.
    let ((total, avg_pleasure, avg_comfort, avg_audacity), locations) = conn
      .call(move |conn| {
        let totals: (i64, Option<f64>, Option<f64>, Option<f64>) = conn.query_row(
          "SELECT COUNT(*),
                  AVG(pleasureRating),
                  AVG(comfortRating),
                  AVG(audacityRating)
           FROM moments",
          [],
          |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        // Equal counts rank by first appearance.
        let mut stmt = conn.prepare(
          "SELECT location, COUNT(*) AS count
           FROM moments
           GROUP BY location
           ORDER BY count DESC, MIN(id) ASC
           LIMIT ?1",
        )?;
        let locations = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((totals, locations))
      })
      .await?;

    Ok(Statistics {
      total:         to_count(total)?,
      avg_pleasure:  avg_pleasure.unwrap_or(0.0),
      avg_comfort:   avg_comfort.unwrap_or(0.0),
      avg_audacity:  avg_audacity.unwrap_or(0.0),
      top_locations: locations
        .into_iter()
        .map(|(location, count)| to_count(count).map(|count| LocationCount { location, count }))
        .collect::<Result<_>>()?,
    })
  }
}

fn to_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::Decode(format!("negative count: {n}")))
}
