//! The `MomentStore` and `PreferenceStore` traits.
//!
//! Storage backends (e.g. `moments-store-sqlite`) implement these. The state
//! containers depend on the abstractions, not on a concrete backend.

use std::future::Future;

use crate::{
  moment::{Moment, MomentId, MomentPatch, NewMoment},
  stats::Statistics,
};

// ─── Moments ─────────────────────────────────────────────────────────────────

/// Abstraction over a moment record store.
///
/// Every operation other than [`initialize`](MomentStore::initialize) must
/// fail with a "not initialised" error until initialisation has completed.
/// Nothing is retried internally.
pub trait MomentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Open the underlying database and ensure the schema exists. Idempotent.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Release the connection. Later calls fail until re-initialised.
  fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All moments, most recent `date` first, ties by most recent `created_at`.
  fn list_all(&self) -> impl Future<Output = Result<Vec<Moment>, Self::Error>> + Send + '_;

  /// Retrieve a moment by id. Returns `None` if not found.
  fn get_by_id(
    &self,
    id: MomentId,
  ) -> impl Future<Output = Result<Option<Moment>, Self::Error>> + Send + '_;

  /// Validate and persist a new moment; returns the assigned id.
  fn create(
    &self,
    input: NewMoment,
  ) -> impl Future<Output = Result<MomentId, Self::Error>> + Send + '_;

  /// Apply the fields present in `patch`. An empty patch is a no-op.
  fn update(
    &self,
    id: MomentId,
    patch: MomentPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a moment. Deleting an unknown id succeeds.
  fn delete(&self, id: MomentId) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Count, rating means and most frequent locations over all rows.
  fn statistics(&self) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// A string key-value persistence primitive.
pub trait PreferenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
