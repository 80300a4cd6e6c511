// ── One-shot synchronization primitive ──
//
// Runs its fetch once per change of a dependency key, plus on demand via
// `refetch`. Unlike the continuous primitive, every run is a user-visible
// loading transition.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::state::{Shared, SyncState, boxed_op};

/// A fetch-on-change subscription to a remote value.
///
/// The fetch runs at creation and again whenever [`set_deps`](Self::set_deps)
/// is given a key that differs from the current one by value equality;
/// re-supplying an equal key does nothing. [`refetch`](Self::refetch) runs
/// it unconditionally. When runs overlap, only the most recently initiated
/// run's result is accepted.
pub struct OnChange<T, K> {
    shared: Arc<Shared<T>>,
    deps: Mutex<K>,
}

impl<T, K> OnChange<T, K>
where
    T: Send + Sync + 'static,
    K: PartialEq,
{
    /// Create the subscription and run the fetch once.
    pub fn new<F, Fut>(fetch: F, deps: K) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
    {
        let sub = Self {
            shared: Shared::new(boxed_op(fetch)),
            deps: Mutex::new(deps),
        };
        sub.run();
        sub
    }

    fn run(&self) {
        self.shared.mark_loading();
        self.shared.launch();
    }

    /// Supply the current dependency key, re-running the fetch iff it
    /// changed by value equality.
    pub fn set_deps(&self, deps: K) {
        let mut current = self.deps.lock().expect("deps lock poisoned");
        if *current == deps {
            return;
        }
        *current = deps;
        drop(current);
        self.run();
    }

    /// Re-run the fetch on demand, regardless of the dependency key.
    pub fn refetch(&self) {
        self.run();
    }

    /// Swap the fetch operation. Takes effect on the next run.
    pub fn set_fetch<F, Fut>(&self, fetch: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
    {
        self.shared.set_fetch(boxed_op(fetch));
    }

    /// Watch the subscription's state.
    pub fn subscribe(&self) -> watch::Receiver<SyncState<T>> {
        self.shared.subscribe()
    }

    /// Point-in-time snapshot of the subscription's state.
    pub fn state(&self) -> SyncState<T> {
        self.shared.snapshot()
    }

    /// Tear the subscription down explicitly (equivalent to dropping it).
    pub fn shutdown(&self) {
        self.shared.cancel();
    }
}

impl<T, K> Drop for OnChange<T, K> {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}
