//! Error types for `moments-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A field value lies outside its domain (e.g. a rating of 0 or 11).
  #[error("constraint violation on {field}: {reason}")]
  ConstraintViolation { field: String, reason: String },

  #[error("unknown renew value: {0:?}")]
  UnknownRenew(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn violation(field: &str, reason: impl Into<String>) -> Self {
    Self::ConstraintViolation { field: field.to_owned(), reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
