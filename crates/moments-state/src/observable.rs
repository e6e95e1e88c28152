//! A value that notifies subscribers whenever it changes.

use tokio::sync::watch;

/// Shared state plus a set of subscribers, backed by a [`watch`] channel.
///
/// Every [`update`](Self::update) notifies all receivers obtained from
/// [`subscribe`](Self::subscribe). Updates succeed even with no subscribers.
#[derive(Debug)]
pub struct Observable<T> {
  tx: watch::Sender<T>,
}

impl<T> Observable<T> {
  pub fn new(initial: T) -> Self {
    let (tx, _rx) = watch::channel(initial);
    Self { tx }
  }

  /// Mutate the value in place and notify subscribers.
  pub fn update(&self, f: impl FnOnce(&mut T)) { self.tx.send_modify(f); }

  /// Borrow the current value. Do not hold the guard across an `.await`.
  pub fn borrow(&self) -> watch::Ref<'_, T> { self.tx.borrow() }

  pub fn subscribe(&self) -> watch::Receiver<T> { self.tx.subscribe() }
}

impl<T: Clone> Observable<T> {
  /// A clone of the current value.
  pub fn get(&self) -> T { self.tx.borrow().clone() }
}

impl<T: Default> Default for Observable<T> {
  fn default() -> Self { Self::new(T::default()) }
}
