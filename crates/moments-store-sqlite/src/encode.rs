//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are written as RFC 3339 strings with nanosecond precision and a
//! `Z` suffix. The width is fixed, so lexical order matches chronological
//! order among rows this crate wrote.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use moments_core::moment::{Moment, MomentId, MomentPatch, Renew};
use rusqlite::types::Value;

use crate::{Error, Result};

/// Column list shared by every `SELECT` that produces a [`RawMoment`].
pub const SELECT_MOMENTS: &str = "
  SELECT id, title, location, context, date, companion,
         pleasureRating, comfortRating, audacityRating,
         topTags, flopTags, personalNotes, toRenew, createdAt
  FROM moments";

/// Column name → Rust field name, for reporting engine constraint failures.
const COLUMN_FIELDS: &[(&str, &str)] = &[
  ("title", "title"),
  ("location", "location"),
  ("context", "context"),
  ("date", "date"),
  ("companion", "companion"),
  ("pleasureRating", "pleasure_rating"),
  ("comfortRating", "comfort_rating"),
  ("audacityRating", "audacity_rating"),
  ("topTags", "top_tags"),
  ("flopTags", "flop_tags"),
  ("personalNotes", "personal_notes"),
  ("toRenew", "to_renew"),
  ("createdAt", "created_at"),
];

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Format written by SQLite's `datetime('now')`, always UTC.
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC 3339 timestamp, or the bare `YYYY-MM-DD HH:MM:SS` form that
/// the mobile app's `datetime('now')` defaults produced.
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .or_else(|e| {
      NaiveDateTime::parse_from_str(s, SQLITE_DATETIME)
        .map(|naive| naive.and_utc())
        .map_err(|_| e)
    })
    .map_err(|e| Error::Decode(format!("invalid timestamp {s:?}: {e}")))
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

fn decode_rating(column: &str, value: i64) -> Result<u8> {
  u8::try_from(value)
    .map_err(|_| Error::Decode(format!("{column} out of range: {value}")))
}

// ─── Constraint messages ─────────────────────────────────────────────────────

/// Extract the offending field from an SQLite constraint message such as
/// `CHECK constraint failed: pleasureRating BETWEEN 1 AND 10` or
/// `NOT NULL constraint failed: moments.title`.
pub fn constraint_field(message: &str) -> String {
  let detail = message
    .split_once("failed: ")
    .map_or(message, |(_, rest)| rest);
  let token = detail.split_whitespace().next().unwrap_or(detail);
  let column = token.rsplit('.').next().unwrap_or(token);

  COLUMN_FIELDS
    .iter()
    .find(|(col, _)| *col == column)
    .map_or(column, |(_, field)| *field)
    .to_owned()
}

// ─── Partial updates ─────────────────────────────────────────────────────────

/// Flatten a patch into `(column, value)` pairs. Columns are static strings;
/// values are always bound as parameters.
pub fn encode_patch(patch: MomentPatch) -> Vec<(&'static str, Value)> {
  let mut out = Vec::new();

  if let Some(v) = patch.title { out.push(("title", Value::Text(v))); }
  if let Some(v) = patch.location { out.push(("location", Value::Text(v))); }
  if let Some(v) = patch.context { out.push(("context", Value::Text(v))); }
  if let Some(v) = patch.date { out.push(("date", Value::Text(encode_dt(v)))); }
  if let Some(v) = patch.companion { out.push(("companion", Value::Text(v))); }
  if let Some(v) = patch.pleasure_rating {
    out.push(("pleasureRating", Value::Integer(i64::from(v))));
  }
  if let Some(v) = patch.comfort_rating {
    out.push(("comfortRating", Value::Integer(i64::from(v))));
  }
  if let Some(v) = patch.audacity_rating {
    out.push(("audacityRating", Value::Integer(i64::from(v))));
  }
  if let Some(v) = patch.top_tags { out.push(("topTags", Value::Text(v))); }
  if let Some(v) = patch.flop_tags { out.push(("flopTags", Value::Text(v))); }
  if let Some(v) = patch.personal_notes {
    out.push(("personalNotes", v.map_or(Value::Null, Value::Text)));
  }
  if let Some(v) = patch.to_renew {
    out.push((
      "toRenew",
      v.map_or(Value::Null, |r| Value::Text(r.as_str().to_owned())),
    ));
  }

  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `moments` row.
pub struct RawMoment {
  pub id:              MomentId,
  pub title:           String,
  pub location:        String,
  pub context:         String,
  pub date:            String,
  pub companion:       String,
  pub pleasure_rating: i64,
  pub comfort_rating:  i64,
  pub audacity_rating: i64,
  pub top_tags:        String,
  pub flop_tags:       String,
  pub personal_notes:  Option<String>,
  pub to_renew:        Option<String>,
  pub created_at:      String,
}

impl RawMoment {
  /// Row mapper for statements built on [`SELECT_MOMENTS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      title:           row.get(1)?,
      location:        row.get(2)?,
      context:         row.get(3)?,
      date:            row.get(4)?,
      companion:       row.get(5)?,
      pleasure_rating: row.get(6)?,
      comfort_rating:  row.get(7)?,
      audacity_rating: row.get(8)?,
      top_tags:        row.get(9)?,
      flop_tags:       row.get(10)?,
      personal_notes:  row.get(11)?,
      to_renew:        row.get(12)?,
      created_at:      row.get(13)?,
    })
  }

  pub fn into_moment(self) -> Result<Moment> {
    let to_renew = self
      .to_renew
      .as_deref()
      .map(str::parse::<Renew>)
      .transpose()?;

    Ok(Moment {
      id: self.id,
      title: self.title,
      location: self.location,
      context: self.context,
      date: decode_dt(&self.date)?,
      companion: self.companion,
      pleasure_rating: decode_rating("pleasureRating", self.pleasure_rating)?,
      comfort_rating: decode_rating("comfortRating", self.comfort_rating)?,
      audacity_rating: decode_rating("audacityRating", self.audacity_rating)?,
      top_tags: self.top_tags,
      flop_tags: self.flop_tags,
      personal_notes: self.personal_notes,
      to_renew,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_lossless() {
    let dt = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    assert_eq!(encode_dt(dt), "2024-03-01T09:30:00.000000000Z");

    let precise = dt + chrono::Duration::nanoseconds(123_456_789);
    let s = encode_dt(precise);
    assert_eq!(s, "2024-03-01T09:30:00.123456789Z");
    assert_eq!(decode_dt(&s).unwrap(), precise);
  }

  #[test]
  fn sqlite_default_formats_decode() {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    assert_eq!(
      decode_dt("2024-03-01T09:30:00.123Z").unwrap(),
      base + chrono::Duration::milliseconds(123)
    );
    assert_eq!(decode_dt("2024-03-01 09:30:00").unwrap(), base);
    assert!(matches!(decode_dt("yesterday"), Err(Error::Decode(_))));
  }

  #[test]
  fn constraint_field_from_check_message() {
    assert_eq!(
      constraint_field("CHECK constraint failed: pleasureRating BETWEEN 1 AND 10"),
      "pleasure_rating"
    );
    assert_eq!(
      constraint_field("NOT NULL constraint failed: moments.title"),
      "title"
    );
  }

  #[test]
  fn patch_encodes_only_present_fields() {
    let patch = MomentPatch {
      comfort_rating: Some(4),
      personal_notes: Some(None),
      ..Default::default()
    };
    let cols = encode_patch(patch);
    assert_eq!(cols.len(), 2);
    assert_eq!(cols[0], ("comfortRating", Value::Integer(4)));
    assert_eq!(cols[1], ("personalNotes", Value::Null));
  }
}
