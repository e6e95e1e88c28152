//! [`MomentsContainer`]: the cached moment list with loading and error state.
//!
//! Consistency is invalidate-and-refetch: every successful mutation is
//! followed by a full [`load`](MomentsContainer::load). There are no
//! optimistic updates.

use std::sync::Arc;

use moments_core::{
  moment::{Moment, MomentId, MomentPatch, NewMoment},
  store::MomentStore,
};
use tokio::sync::watch;

use crate::Observable;

/// Snapshot of the moments container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MomentsState {
  /// Last successfully loaded list, in store order.
  pub moments:    Vec<Moment>,
  pub is_loading: bool,
  /// Message of the most recent failure; cleared when an operation starts.
  pub error:      Option<String>,
}

pub struct MomentsContainer<S> {
  store: Arc<S>,
  state: Observable<MomentsState>,
}

impl<S: MomentStore> MomentsContainer<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, state: Observable::default() }
  }

  pub fn state(&self) -> MomentsState { self.state.get() }

  pub fn subscribe(&self) -> watch::Receiver<MomentsState> {
    self.state.subscribe()
  }

  /// Replace the cached list with the store's contents.
  ///
  /// On failure the previous list is kept and the error is recorded.
  pub async fn load(&self) {
    self.begin();
    match self.store.list_all().await {
      Ok(moments) => self.state.update(|s| {
        s.moments = moments;
        s.is_loading = false;
      }),
      Err(err) => self.fail(&err),
    }
  }

  /// Create a moment and refresh. Returns the new id on success.
  pub async fn create(&self, input: NewMoment) -> Option<MomentId> {
    self.begin();
    match self.store.create(input).await {
      Ok(id) => {
        self.load().await;
        Some(id)
      }
      Err(err) => {
        self.fail(&err);
        None
      }
    }
  }

  /// Apply a partial update and refresh. Returns `false` on failure.
  pub async fn update(&self, id: MomentId, patch: MomentPatch) -> bool {
    self.begin();
    match self.store.update(id, patch).await {
      Ok(()) => {
        self.load().await;
        true
      }
      Err(err) => {
        self.fail(&err);
        false
      }
    }
  }

  /// Delete a moment and refresh. Returns `false` on failure.
  pub async fn delete(&self, id: MomentId) -> bool {
    self.begin();
    match self.store.delete(id).await {
      Ok(()) => {
        self.load().await;
        true
      }
      Err(err) => {
        self.fail(&err);
        false
      }
    }
  }

  /// Look up a moment in the cached list only; the store is not queried.
  pub fn find_by_id(&self, id: MomentId) -> Option<Moment> {
    self.state.borrow().moments.iter().find(|m| m.id == id).cloned()
  }

  fn begin(&self) {
    self.state.update(|s| {
      s.is_loading = true;
      s.error = None;
    });
  }

  fn fail(&self, err: &S::Error) {
    tracing::warn!(error = %err, "moment store operation failed");
    let message = err.to_string();
    self.state.update(|s| {
      s.error = Some(message);
      s.is_loading = false;
    });
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone as _, Utc};
  use moments_store_sqlite::SqliteStore;

  use super::*;

  fn day(m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, m, d, 18, 30, 0).unwrap()
  }

  fn moment(title: &str, date: DateTime<Utc>) -> NewMoment {
    NewMoment::new(title, "Home", "Alex", date, (5, 5, 5))
  }

  async fn container() -> (Arc<SqliteStore>, MomentsContainer<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let container = MomentsContainer::new(store.clone());
    (store, container)
  }

  fn titles(state: &MomentsState) -> Vec<&str> {
    state.moments.iter().map(|m| m.title.as_str()).collect()
  }

  #[tokio::test]
  async fn load_populates_list_in_store_order() {
    let (store, c) = container().await;
    store.create(moment("first", day(1, 1))).await.unwrap();
    store.create(moment("latest", day(3, 1))).await.unwrap();

    c.load().await;

    let state = c.state();
    assert_eq!(titles(&state), ["latest", "first"]);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
  }

  #[tokio::test]
  async fn create_refreshes_cache() {
    let (_store, c) = container().await;

    let id = c.create(moment("new", day(1, 1))).await.expect("created");

    assert_eq!(c.state().moments.len(), 1);
    assert_eq!(c.find_by_id(id).map(|m| m.title), Some("new".to_owned()));
  }

  #[tokio::test]
  async fn failed_create_records_error_without_refresh() {
    let (store, c) = container().await;
    c.create(moment("kept", day(1, 1))).await.unwrap();
    // Written behind the container's back; only a refresh would reveal it.
    store.create(moment("hidden", day(2, 1))).await.unwrap();

    let bad = NewMoment::new("bad", "Home", "Alex", day(3, 1), (0, 5, 5));
    assert_eq!(c.create(bad).await, None);

    let state = c.state();
    assert!(!state.is_loading);
    assert!(state.error.as_deref().unwrap().contains("pleasure_rating"));
    assert_eq!(titles(&state), ["kept"]);
  }

  #[tokio::test]
  async fn update_and_delete_refresh_cache() {
    let (_store, c) = container().await;
    let id = c.create(moment("before", day(1, 1))).await.unwrap();

    let patch = MomentPatch { title: Some("after".into()), ..Default::default() };
    assert!(c.update(id, patch).await);
    assert_eq!(titles(&c.state()), ["after"]);

    assert!(c.delete(id).await);
    assert!(c.state().moments.is_empty());
  }

  #[tokio::test]
  async fn update_of_missing_moment_sets_error() {
    let (_store, c) = container().await;
    let patch = MomentPatch { title: Some("x".into()), ..Default::default() };

    assert!(!c.update(404, patch).await);
    assert_eq!(c.state().error.as_deref(), Some("moment not found: 404"));
  }

  #[tokio::test]
  async fn next_operation_clears_previous_error() {
    let (_store, c) = container().await;
    let patch = MomentPatch { title: Some("x".into()), ..Default::default() };
    c.update(404, patch).await;
    assert!(c.state().error.is_some());

    c.load().await;
    assert_eq!(c.state().error, None);
  }

  #[tokio::test]
  async fn failed_load_keeps_previous_list() {
    let (store, c) = container().await;
    c.create(moment("a", day(1, 1))).await.unwrap();
    c.create(moment("b", day(2, 1))).await.unwrap();

    store.close().await.unwrap();
    c.load().await;

    let state = c.state();
    assert_eq!(titles(&state), ["b", "a"]);
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("store is not initialized"));
  }

  #[tokio::test]
  async fn find_by_id_only_sees_cache() {
    let (store, c) = container().await;
    let id = store.create(moment("durable", day(1, 1))).await.unwrap();

    assert!(c.find_by_id(id).is_none());
    c.load().await;
    assert!(c.find_by_id(id).is_some());
  }

  #[tokio::test]
  async fn subscribers_are_notified_of_loads() {
    let (_store, c) = container().await;
    let mut rx = c.subscribe();
    rx.borrow_and_update();

    c.load().await;

    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_loading);
  }
}
