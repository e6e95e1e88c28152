//! Aggregate statistics over all recorded moments.

use serde::{Deserialize, Serialize};

/// Number of locations reported in [`Statistics::top_locations`].
pub const TOP_LOCATIONS: usize = 3;

/// A location paired with how many moments took place there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
  pub location: String,
  pub count:    u64,
}

/// Totals and means computed over every row in the store.
///
/// Means are `0.0` when the store is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
  pub total:         u64,
  pub avg_pleasure:  f64,
  pub avg_comfort:   f64,
  pub avg_audacity:  f64,
  /// At most [`TOP_LOCATIONS`] entries, most frequent first.
  pub top_locations: Vec<LocationCount>,
}

impl Statistics {
  /// Percentage of all moments that took place at `entry`'s location.
  pub fn share(&self, entry: &LocationCount) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      entry.count as f64 / self.total as f64 * 100.0
    }
  }
}
