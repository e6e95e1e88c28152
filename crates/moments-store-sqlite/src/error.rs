//! Error type for `moments-store-sqlite`.

use moments_core::moment::MomentId;
use thiserror::Error;

use crate::encode::constraint_field;

#[derive(Debug, Error)]
pub enum Error {
  /// An operation ran before `initialize()` completed, or after `close()`.
  #[error("store is not initialized")]
  NotInitialized,

  /// The database could not be opened or its schema applied.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] tokio_rusqlite::Error),

  #[error("storage i/o error: {0}")]
  StorageIo(#[source] tokio_rusqlite::Error),

  #[error("constraint violation on {field}: {reason}")]
  ConstraintViolation { field: String, reason: String },

  /// Only raised by updates; reads report absence as `None`.
  #[error("moment not found: {0}")]
  NotFound(MomentId),

  /// A stored column could not be decoded into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, Some(message))) =
      &err
      && code.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Self::ConstraintViolation {
        field:  constraint_field(message),
        reason: message.clone(),
      };
    }
    Self::StorageIo(err)
  }
}

impl From<moments_core::Error> for Error {
  fn from(err: moments_core::Error) -> Self {
    match err {
      moments_core::Error::ConstraintViolation { field, reason } => {
        Self::ConstraintViolation { field, reason }
      }
      other => Self::Decode(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
