// ── Shared subscription bookkeeping ──
//
// One `Shared<T>` sits behind each live subscription, whichever trigger
// policy drives it. It owns the watch channel consumers observe, the
// swappable fetch operation, the cycle counter used for stale-response
// suppression, and the cancellation token that makes teardown observable
// to in-flight cycles.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub(crate) type FetchFuture<T> =
    Pin<Box<dyn Future<Output = Result<T, nestling_api::Error>> + Send>>;
pub(crate) type FetchOp<T> = Box<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Observable state of one subscription.
///
/// `value` always holds the latest *accepted* result and survives later
/// failures -- consumers render stale-but-valid data next to an error
/// indicator rather than blanking the view. A `None` value means nothing
/// has ever been accepted and the view should show an explicit
/// "unavailable" state.
#[derive(Debug)]
pub struct SyncState<T> {
    pub value: Option<Arc<T>>,
    pub loading: bool,
    pub error: Option<Arc<nestling_api::Error>>,
}

impl<T> SyncState<T> {
    pub(crate) fn initial() -> Self {
        Self {
            value: None,
            loading: true,
            error: None,
        }
    }

    /// `true` when no result has ever been accepted.
    pub fn is_unavailable(&self) -> bool {
        self.value.is_none()
    }
}

impl<T> Clone for SyncState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

pub(crate) struct Shared<T> {
    state: watch::Sender<SyncState<T>>,
    fetch: ArcSwap<FetchOp<T>>,
    /// Cycle ids handed out so far; each initiated fetch gets the next one.
    cycles: AtomicU64,
    /// Highest cycle id whose result has been accepted (or sealed past).
    accepted: AtomicU64,
    cancel: CancellationToken,
}

impl<T> Shared<T> {
    pub(crate) fn new(fetch: FetchOp<T>) -> Arc<Self> {
        let (state, _) = watch::channel(SyncState::initial());
        Arc::new(Self {
            state,
            fetch: ArcSwap::from_pointee(fetch),
            cycles: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        })
    }

    /// Apply one cycle's outcome, subject to liveness and ordering checks.
    ///
    /// A result is dropped when the subscription has been torn down, or
    /// when a later-initiated cycle's result has already been accepted
    /// (stale-response suppression). The ordering check runs inside the
    /// sender's lock, so the check and the write are one atomic step: two
    /// cycles settling concurrently cannot interleave between them, and an
    /// earlier cycle can never overwrite a later cycle's landed result.
    /// Stale results are dropped without notifying receivers.
    fn settle(&self, id: u64, result: Result<T, nestling_api::Error>) {
        if self.cancel.is_cancelled() {
            trace!(cycle = id, "result dropped: subscription torn down");
            return;
        }

        self.state.send_if_modified(|s| {
            let prev = self.accepted.fetch_max(id, Ordering::SeqCst);
            if prev >= id {
                trace!(cycle = id, newest = prev, "stale result dropped");
                return false;
            }

            s.loading = false;
            match result {
                Ok(v) => {
                    s.value = Some(Arc::new(v));
                    s.error = None;
                }
                Err(e) => {
                    s.error = Some(Arc::new(e));
                }
            }
            true
        });
    }

    /// Permanently suppress every cycle initiated so far.
    ///
    /// Used on disable: in-flight fetches may still complete, but none of
    /// them may write back. Cycles initiated after a later re-enable get
    /// higher ids and are unaffected.
    pub(crate) fn seal(&self) {
        let issued = self.cycles.load(Ordering::SeqCst);
        self.accepted.fetch_max(issued, Ordering::SeqCst);
    }

    /// Flag a user-visible loading transition (one-shot runs only).
    pub(crate) fn mark_loading(&self) {
        self.state.send_modify(|s| s.loading = true);
    }

    pub(crate) fn set_fetch(&self, op: FetchOp<T>) {
        self.fetch.store(Arc::new(op));
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SyncState<T>> {
        self.state.subscribe()
    }

    pub(crate) fn snapshot(&self) -> SyncState<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    pub(crate) fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Initiate one cycle: assign the next id, call the *current* fetch
    /// operation, and spawn a task that settles when the fetch does.
    ///
    /// The operation is dereferenced here, at initiation time, never from a
    /// closure captured when the schedule was created -- swapping the
    /// operation takes effect on the very next cycle.
    pub(crate) fn launch(self: &Arc<Self>) {
        let id = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let op = self.fetch.load_full();
        let fut = (op.as_ref())();
        trace!(cycle = id, "fetch initiated");

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = fut.await;
            this.settle(id, result);
        });
    }
}

/// Box a fetch closure into the erased form `Shared` stores.
pub(crate) fn boxed_op<T, F, Fut>(fetch: F) -> FetchOp<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
{
    Box::new(move || Box::pin(fetch()) as FetchFuture<T>)
}
