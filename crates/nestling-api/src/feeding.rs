// Feeding resource accessors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Error;

/// How the feed was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedingKind {
    Bottle,
    Nursing,
    Solid,
}

/// One logged feed, most recent first in history responses.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedingEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: FeedingKind,
    /// Bottle volume; absent for nursing and solids.
    pub amount_ml: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct FeedingLog {
    #[serde(rename = "type")]
    kind: FeedingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount_ml: Option<f64>,
}

impl ApiClient {
    /// `POST /api/feeding`
    pub async fn log_feeding(&self, kind: FeedingKind, amount_ml: Option<f64>) -> Result<(), Error> {
        self.post_unit("/api/feeding", &FeedingLog { kind, amount_ml })
            .await
    }

    /// `GET /api/feeding/history?limit=N`
    ///
    /// Most recent first, capped at `limit`.
    pub async fn feeding_history(&self, limit: u32) -> Result<Vec<FeedingEvent>, Error> {
        self.get_json_with_params("/api/feeding/history", &[("limit", limit.to_string())])
            .await
    }
}
