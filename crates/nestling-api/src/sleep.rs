// Sleep resource accessors
//
// Daily nap stats, wake-window status, night sleep, and the 7-day trend.
// All statistics are computed server-side; this module only names the
// resources and binds them to typed shapes.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Error;

/// Wake-window urgency as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Urgency {
    /// Within the recommended window.
    Green,
    /// Past the minimum window -- nap soon.
    Yellow,
    /// Past the maximum window -- overdue.
    Red,
}

/// Current wake-window status.
#[derive(Debug, Clone, Deserialize)]
pub struct WakeWindow {
    pub awake_minutes: f64,
    pub window_min_minutes: f64,
    pub window_max_minutes: f64,
    pub remaining_minutes: f64,
    pub urgency: Urgency,
    pub baby_age_months: u8,
}

/// Last night's sleep (7pm-7am), as computed by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct NightSleep {
    pub total_minutes: f64,
    pub wake_count: u32,
    pub longest_stretch_minutes: f64,
}

/// Today's sleep statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct SleepStats {
    pub total_nap_minutes: f64,
    pub nap_count: u32,
    pub longest_nap_minutes: f64,
    pub wake_window: WakeWindow,
    pub night_sleep: NightSleep,
}

/// One day of the weekly trend, oldest first.
#[derive(Debug, Clone, Deserialize)]
pub struct SleepDay {
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    /// Short weekday label (`Mon`, `Tue`, ...).
    pub day_label: String,
    pub total_nap_minutes: f64,
    pub nap_count: u32,
    pub longest_nap_minutes: f64,
}

impl ApiClient {
    /// `GET /api/sleep/stats`
    pub async fn sleep_stats(&self) -> Result<SleepStats, Error> {
        self.get_json("/api/sleep/stats").await
    }

    /// `GET /api/sleep/weekly`
    ///
    /// Returns seven entries, oldest day first.
    pub async fn sleep_weekly(&self) -> Result<Vec<SleepDay>, Error> {
        self.get_json("/api/sleep/weekly").await
    }
}
