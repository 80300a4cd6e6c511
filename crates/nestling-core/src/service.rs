// ── Dashboard service ──
//
// Binds the typed resource accessors to synchronization primitives: one
// continuous subscription per stats resource, one fetch-on-change
// subscription per event log. Writes go straight through the gateway and
// never touch subscription state -- callers refresh the affected log
// afterwards, so a refresh failure after a successful write surfaces as
// the refresh's error, not a write error.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::info;

use nestling_api::{
    ApiClient, AwakeStatus, DiaperEvent, DiaperKind, DiaperStats, FeedingEvent, FeedingKind,
    Health, SleepDay, SleepStats,
};

use crate::error::CoreError;
use crate::sync::{OnChange, Poller, SyncState};

/// Refresh cadence and sizing for the dashboard's subscriptions.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Period for the stats pollers (sleep, diaper).
    pub stats_interval: Duration,
    /// Period for the health poller.
    pub health_interval: Duration,
    /// Row cap for the history reads.
    pub history_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            stats_interval: Duration::from_secs(15),
            health_interval: Duration::from_secs(30),
            history_limit: 25,
        }
    }
}

/// Dependency key for an event-log read: the row cap plus a generation
/// counter bumped after each successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogKey {
    limit: u32,
    generation: u64,
}

/// The dashboard's data layer: every widget reads from one of these
/// subscriptions, every key binding writes through one of the log methods.
///
/// Dropping the service tears all subscriptions down.
pub struct Dashboard {
    api: Arc<ApiClient>,
    sleep_stats: Poller<SleepStats>,
    diaper_stats: Poller<DiaperStats>,
    health: Poller<Health>,
    awake: Poller<AwakeStatus>,
    weekly: OnChange<Vec<SleepDay>, NaiveDate>,
    diaper_log: OnChange<Vec<DiaperEvent>, LogKey>,
    feeding_log: OnChange<Vec<FeedingEvent>, LogKey>,
    diaper_generation: AtomicU64,
    feeding_generation: AtomicU64,
    history_limit: u32,
}

impl Dashboard {
    /// Wire up all subscriptions; fetching starts immediately.
    ///
    /// `today` keys the weekly-trend subscription -- feed it the current
    /// date from [`observe_date`](Self::observe_date) so the trend re-runs
    /// when the day rolls over.
    pub fn new(api: ApiClient, config: &DashboardConfig, today: NaiveDate) -> Self {
        let api = Arc::new(api);
        let limit = config.history_limit;

        let sleep_stats = Poller::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.sleep_stats().await }
                }
            },
            config.stats_interval,
        );

        let diaper_stats = Poller::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.diaper_stats().await }
                }
            },
            config.stats_interval,
        );

        let health = Poller::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.health().await }
                }
            },
            config.health_interval,
        );

        // Legacy classifier endpoint; shares the health cadence.
        let awake = Poller::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.awake_status().await }
                }
            },
            config.health_interval,
        );

        let weekly = OnChange::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.sleep_weekly().await }
                }
            },
            today,
        );

        let diaper_log = OnChange::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.diaper_history(limit).await }
                }
            },
            LogKey {
                limit,
                generation: 0,
            },
        );

        let feeding_log = OnChange::new(
            {
                let api = Arc::clone(&api);
                move || {
                    let api = Arc::clone(&api);
                    async move { api.feeding_history(limit).await }
                }
            },
            LogKey {
                limit,
                generation: 0,
            },
        );

        info!(base_url = %api.base_url(), "dashboard subscriptions started");

        Self {
            api,
            sleep_stats,
            diaper_stats,
            health,
            awake,
            weekly,
            diaper_log,
            feeding_log,
            diaper_generation: AtomicU64::new(0),
            feeding_generation: AtomicU64::new(0),
            history_limit: limit,
        }
    }

    // ── Read subscriptions ───────────────────────────────────────────

    pub fn sleep_stats(&self) -> watch::Receiver<SyncState<SleepStats>> {
        self.sleep_stats.subscribe()
    }

    pub fn diaper_stats(&self) -> watch::Receiver<SyncState<DiaperStats>> {
        self.diaper_stats.subscribe()
    }

    pub fn health(&self) -> watch::Receiver<SyncState<Health>> {
        self.health.subscribe()
    }

    pub fn awake_status(&self) -> watch::Receiver<SyncState<AwakeStatus>> {
        self.awake.subscribe()
    }

    pub fn weekly(&self) -> watch::Receiver<SyncState<Vec<SleepDay>>> {
        self.weekly.subscribe()
    }

    pub fn diaper_log(&self) -> watch::Receiver<SyncState<Vec<DiaperEvent>>> {
        self.diaper_log.subscribe()
    }

    pub fn feeding_log(&self) -> watch::Receiver<SyncState<Vec<FeedingEvent>>> {
        self.feeding_log.subscribe()
    }

    // ── Triggers ─────────────────────────────────────────────────────

    /// Supply the current date; the weekly trend re-runs when it changes.
    pub fn observe_date(&self, today: NaiveDate) {
        self.weekly.set_deps(today);
    }

    /// Re-read the weekly trend on demand.
    pub fn refresh_weekly(&self) {
        self.weekly.refetch();
    }

    /// Re-read the diaper log (call after a successful diaper write).
    pub fn refresh_diaper_log(&self) {
        let generation = self.diaper_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.diaper_log.set_deps(LogKey {
            limit: self.history_limit,
            generation,
        });
    }

    /// Re-read the feeding log (call after a successful feeding write).
    pub fn refresh_feeding_log(&self) {
        let generation = self.feeding_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.feeding_log.set_deps(LogKey {
            limit: self.history_limit,
            generation,
        });
    }

    // ── Write path ───────────────────────────────────────────────────

    /// Record a diaper change. Reports only the write's own outcome;
    /// the caller refreshes the log separately.
    pub async fn log_diaper(&self, kind: DiaperKind) -> Result<(), CoreError> {
        self.api.log_diaper(kind).await?;
        info!(%kind, "diaper change recorded");
        Ok(())
    }

    /// Record a feeding. Reports only the write's own outcome.
    pub async fn log_feeding(
        &self,
        kind: FeedingKind,
        amount_ml: Option<f64>,
    ) -> Result<(), CoreError> {
        self.api.log_feeding(kind, amount_ml).await?;
        info!(%kind, ?amount_ml, "feeding recorded");
        Ok(())
    }

    /// Flip the backend's sleep-notification toggle.
    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<(), CoreError> {
        self.api.set_notifications_enabled(enabled).await?;
        Ok(())
    }

    /// Read the backend's sleep-notification toggle.
    pub async fn notifications_enabled(&self) -> Result<bool, CoreError> {
        Ok(self.api.notifications_enabled().await?)
    }

    /// Tear down every subscription. Equivalent to dropping the service.
    pub fn shutdown(&self) {
        self.sleep_stats.shutdown();
        self.diaper_stats.shutdown();
        self.health.shutdown();
        self.awake.shutdown();
        self.weekly.shutdown();
        self.diaper_log.shutdown();
        self.feeding_log.shutdown();
    }
}
