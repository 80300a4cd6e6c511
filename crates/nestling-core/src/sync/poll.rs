// ── Continuous synchronization primitive ──
//
// Fetch immediately, then on a fixed period measured from schedule time,
// until disabled or dropped. Slow fetches never delay the schedule, so two
// cycles may be in flight at once; ordering is enforced at write-back by
// the cycle-id check in `Shared`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, interval_at};
use tracing::debug;

use super::state::{Shared, SyncState, boxed_op};

enum Ctrl {
    Enabled(bool),
    Interval(Duration),
}

/// A continuously polling subscription to a remote value.
///
/// `loading` is `true` only until the first response of the subscription's
/// lifetime -- refresh cycles show stale-but-valid data while fetching,
/// never a loading flicker. A failed cycle surfaces its error and the
/// schedule continues; the next successful cycle clears it.
///
/// Dropping the handle tears the subscription down: the timer is released
/// and any still-in-flight cycle is barred from writing back.
pub struct Poller<T> {
    shared: Arc<Shared<T>>,
    enabled: Arc<AtomicBool>,
    ctrl: mpsc::UnboundedSender<Ctrl>,
}

impl<T: Send + Sync + 'static> Poller<T> {
    /// Start polling: one fetch now, then one every `period`.
    pub fn new<F, Fut>(fetch: F, period: Duration) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
    {
        Self::with_enabled(fetch, period, true)
    }

    /// Create the subscription without starting the schedule.
    ///
    /// The first fetch is issued when `set_enabled(true)` is called.
    pub fn disabled<F, Fut>(fetch: F, period: Duration) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
    {
        Self::with_enabled(fetch, period, false)
    }

    fn with_enabled<F, Fut>(fetch: F, period: Duration, enabled: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
    {
        let shared = Shared::new(boxed_op(fetch));
        let enabled = Arc::new(AtomicBool::new(enabled));
        let (ctrl_tx, ctrl_rx) = mpsc::unbounded_channel();

        tokio::spawn(drive(
            Arc::clone(&shared),
            Arc::clone(&enabled),
            period,
            ctrl_rx,
        ));

        Self {
            shared,
            enabled,
            ctrl: ctrl_tx,
        }
    }

    /// Watch the subscription's state.
    pub fn subscribe(&self) -> watch::Receiver<SyncState<T>> {
        self.shared.subscribe()
    }

    /// Point-in-time snapshot of the subscription's state.
    pub fn state(&self) -> SyncState<T> {
        self.shared.snapshot()
    }

    /// Enable or disable the schedule.
    ///
    /// Disabling seals every cycle initiated so far: an in-flight fetch may
    /// still complete but its result is dropped. Re-enabling issues a fetch
    /// immediately and restarts the period from now.
    pub fn set_enabled(&self, on: bool) {
        if self.enabled.swap(on, Ordering::SeqCst) == on {
            return;
        }
        if !on {
            self.shared.seal();
        }
        let _ = self.ctrl.send(Ctrl::Enabled(on));
    }

    /// Replace the period. The previous schedule is canceled and a new one
    /// starts from now; no immediate fetch is issued.
    pub fn set_period(&self, period: Duration) {
        let _ = self.ctrl.send(Ctrl::Interval(period));
    }

    /// Swap the fetch operation. Takes effect on the next initiated cycle.
    pub fn set_fetch<F, Fut>(&self, fetch: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, nestling_api::Error>> + Send + 'static,
    {
        self.shared.set_fetch(boxed_op(fetch));
    }

    /// Tear the subscription down explicitly (equivalent to dropping it).
    pub fn shutdown(&self) {
        self.shared.cancel();
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}

/// Driver task: owns the one timer resource of the subscription.
///
/// The timer fires at fixed period boundaries regardless of how long an
/// individual fetch takes; each tick only *initiates* a cycle and never
/// awaits it.
async fn drive<T: Send + Sync + 'static>(
    shared: Arc<Shared<T>>,
    enabled: Arc<AtomicBool>,
    mut period: Duration,
    mut ctrl: mpsc::UnboundedReceiver<Ctrl>,
) {
    if enabled.load(Ordering::SeqCst) {
        shared.launch();
    }
    let mut ticker = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            biased;

            () = shared.cancelled() => break,

            Some(msg) = ctrl.recv() => match msg {
                Ctrl::Enabled(true) => {
                    shared.launch();
                    ticker = interval_at(Instant::now() + period, period);
                }
                // Tick issuance is gated on the flag below; nothing to do
                // here beyond letting the (now inert) ticker keep its phase.
                Ctrl::Enabled(false) => {}
                Ctrl::Interval(new_period) => {
                    period = new_period;
                    ticker = interval_at(Instant::now() + period, period);
                }
            },

            _ = ticker.tick() => {
                if enabled.load(Ordering::SeqCst) {
                    shared.launch();
                }
            }
        }
    }

    debug!("poll subscription driver stopped");
}
