// Diaper resource accessors
//
// One write accessor (log a change) and two read accessors (daily stats,
// recent history).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Error;

/// What the diaper contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiaperKind {
    Wet,
    Dirty,
    Both,
}

/// The most recent change, embedded in [`DiaperStats`].
#[derive(Debug, Clone, Deserialize)]
pub struct LastChange {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: DiaperKind,
}

/// Today's diaper statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct DiaperStats {
    pub total: u32,
    pub wet: u32,
    pub dirty: u32,
    pub daily_average_7d: f64,
    /// `None` until the first change is ever logged.
    pub last_change: Option<LastChange>,
}

/// One logged change, most recent first in history responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DiaperEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: DiaperKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
struct DiaperLog {
    #[serde(rename = "type")]
    kind: DiaperKind,
}

impl ApiClient {
    /// `POST /api/diaper`
    pub async fn log_diaper(&self, kind: DiaperKind) -> Result<(), Error> {
        self.post_unit("/api/diaper", &DiaperLog { kind }).await
    }

    /// `GET /api/diaper/stats`
    pub async fn diaper_stats(&self) -> Result<DiaperStats, Error> {
        self.get_json("/api/diaper/stats").await
    }

    /// `GET /api/diaper/history?limit=N`
    ///
    /// Most recent first, capped at `limit`.
    pub async fn diaper_history(&self, limit: u32) -> Result<Vec<DiaperEvent>, Error> {
        self.get_json_with_params("/api/diaper/history", &[("limit", limit.to_string())])
            .await
    }
}
