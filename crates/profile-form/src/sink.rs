//! The caller's change sink, held in a slot that always reflects the latest
//! sink the caller rendered with.
//!
//! A save resolves the sink when it completes, not when it starts, so a
//! re-render that swaps the sink while a save is in flight is honoured.

use std::sync::Arc;

use arc_swap::ArcSwap;
use profile_core::UserProfile;

/// Receives the normalized record after each successful save.
pub type ChangeSink = Arc<dyn Fn(UserProfile) + Send + Sync>;

/// A sink that ignores every update.
pub fn noop() -> ChangeSink { Arc::new(|_| {}) }

/// Single-slot holder for the current [`ChangeSink`]. Clones share the slot.
#[derive(Clone)]
pub struct SinkSlot(Arc<ArcSwap<ChangeSink>>);

impl SinkSlot {
  pub fn new(sink: ChangeSink) -> Self { Self(Arc::new(ArcSwap::from_pointee(sink))) }

  /// Replace the sink. Called on every render.
  pub fn set(&self, sink: ChangeSink) { self.0.store(Arc::new(sink)); }

  pub fn current(&self) -> ChangeSink { ChangeSink::clone(&self.0.load_full()) }

  /// Deliver `user` to whichever sink is current right now.
  pub fn notify(&self, user: UserProfile) {
    let sink = self.current();
    sink(user);
  }
}

impl Default for SinkSlot {
  fn default() -> Self { Self::new(noop()) }
}

impl std::fmt::Debug for SinkSlot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SinkSlot").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;

  #[test]
  fn notify_uses_latest_sink() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let slot = SinkSlot::default();

    let first = seen.clone();
    slot.set(Arc::new(move |u: UserProfile| first.lock().unwrap().push(("first", u.id))));
    let second = seen.clone();
    slot.set(Arc::new(move |u: UserProfile| second.lock().unwrap().push(("second", u.id))));

    slot.clone().notify(UserProfile::new(4, "Ann", "a@x.com"));
    assert_eq!(*seen.lock().unwrap(), vec![("second", 4)]);
  }

  #[test]
  fn default_slot_is_a_noop() {
    SinkSlot::default().notify(UserProfile::new(1, "Ann", "a@x.com"));
  }
}
