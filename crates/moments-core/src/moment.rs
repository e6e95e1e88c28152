//! Moment types: the single journaled entity, its creation input, and partial
//! updates.
//!
//! A moment is identified by a store-assigned integer id. `created_at` is set
//! once by the store; every other field can be changed through a
//! [`MomentPatch`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, tags::EMPTY_TAGS};

/// Store-assigned row id. Monotonic; never reused after deletion.
pub type MomentId = i64;

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 10;

// ─── Renew ───────────────────────────────────────────────────────────────────

/// Whether the author would repeat the experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renew {
  Yes,
  No,
}

impl Renew {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Yes => "yes",
      Self::No => "no",
    }
  }
}

impl fmt::Display for Renew {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Renew {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "yes" => Ok(Self::Yes),
      "no" => Ok(Self::No),
      other => Err(Error::UnknownRenew(other.to_owned())),
    }
  }
}

// ─── Moment ──────────────────────────────────────────────────────────────────

/// A persisted moment, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
  pub id:              MomentId,
  pub title:           String,
  pub location:        String,
  /// Free-form context; may be empty.
  pub context:         String,
  /// When the moment happened. Chosen by the user, independent of
  /// `created_at`.
  pub date:            DateTime<Utc>,
  pub companion:       String,
  pub pleasure_rating: u8,
  pub comfort_rating:  u8,
  pub audacity_rating: u8,
  /// Serialised tag list; opaque to the store. See [`crate::tags`].
  pub top_tags:        String,
  pub flop_tags:       String,
  pub personal_notes:  Option<String>,
  pub to_renew:        Option<Renew>,
  /// Set once at insertion time by the store.
  pub created_at:      DateTime<Utc>,
}

// ─── Creation input ──────────────────────────────────────────────────────────

/// Input for creating a moment. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMoment {
  pub title:           String,
  pub location:        String,
  pub context:         String,
  pub date:            DateTime<Utc>,
  pub companion:       String,
  pub pleasure_rating: u8,
  pub comfort_rating:  u8,
  pub audacity_rating: u8,
  pub top_tags:        String,
  pub flop_tags:       String,
  pub personal_notes:  Option<String>,
  pub to_renew:        Option<Renew>,
}

impl NewMoment {
  /// Convenience constructor with an empty context, empty tag lists and no
  /// optional fields.
  pub fn new(
    title: impl Into<String>,
    location: impl Into<String>,
    companion: impl Into<String>,
    date: DateTime<Utc>,
    ratings: (u8, u8, u8),
  ) -> Self {
    let (pleasure_rating, comfort_rating, audacity_rating) = ratings;
    Self {
      title: title.into(),
      location: location.into(),
      context: String::new(),
      date,
      companion: companion.into(),
      pleasure_rating,
      comfort_rating,
      audacity_rating,
      top_tags: EMPTY_TAGS.to_owned(),
      flop_tags: EMPTY_TAGS.to_owned(),
      personal_notes: None,
      to_renew: None,
    }
  }

  /// Check every rating against the 1–10 domain.
  pub fn validate(&self) -> Result<()> {
    validate_rating("pleasure_rating", self.pleasure_rating)?;
    validate_rating("comfort_rating", self.comfort_rating)?;
    validate_rating("audacity_rating", self.audacity_rating)?;
    Ok(())
  }

  /// Attach the store-assigned fields.
  pub fn into_moment(self, id: MomentId, created_at: DateTime<Utc>) -> Moment {
    Moment {
      id,
      title: self.title,
      location: self.location,
      context: self.context,
      date: self.date,
      companion: self.companion,
      pleasure_rating: self.pleasure_rating,
      comfort_rating: self.comfort_rating,
      audacity_rating: self.audacity_rating,
      top_tags: self.top_tags,
      flop_tags: self.flop_tags,
      personal_notes: self.personal_notes,
      to_renew: self.to_renew,
      created_at,
    }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// A partial update. `None` leaves a field unchanged.
///
/// The nullable fields use a nested option: `Some(None)` clears the stored
/// value, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentPatch {
  pub title:           Option<String>,
  pub location:        Option<String>,
  pub context:         Option<String>,
  pub date:            Option<DateTime<Utc>>,
  pub companion:       Option<String>,
  pub pleasure_rating: Option<u8>,
  pub comfort_rating:  Option<u8>,
  pub audacity_rating: Option<u8>,
  pub top_tags:        Option<String>,
  pub flop_tags:       Option<String>,
  pub personal_notes:  Option<Option<String>>,
  pub to_renew:        Option<Option<Renew>>,
}

impl MomentPatch {
  /// `true` when no field is set; applying such a patch issues no write.
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn validate(&self) -> Result<()> {
    let ratings = [
      ("pleasure_rating", self.pleasure_rating),
      ("comfort_rating", self.comfort_rating),
      ("audacity_rating", self.audacity_rating),
    ];
    for (field, value) in ratings {
      if let Some(v) = value {
        validate_rating(field, v)?;
      }
    }
    Ok(())
  }
}

fn validate_rating(field: &str, value: u8) -> Result<()> {
  if (RATING_MIN..=RATING_MAX).contains(&value) {
    Ok(())
  } else {
    Err(Error::violation(
      field,
      format!("{value} is outside {RATING_MIN}..={RATING_MAX}"),
    ))
  }
}
