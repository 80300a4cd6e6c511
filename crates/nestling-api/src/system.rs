// System and legacy monitor endpoints
//
// Health is JSON; the notification toggle and the awake classifier expose
// the monitor's pre-JSON plain-text surface, decoded leniently here so no
// caller ever touches raw response bodies.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Error;

/// Monitor liveness and detector state.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub is_awake: bool,
    pub body_found: bool,
    pub model_sees_baby: bool,
    pub focus_region_set: bool,
}

/// Decoded form of the classifier's `"<avg_awake>,<reason>,..."` line.
#[derive(Debug, Clone, PartialEq)]
pub struct AwakeStatus {
    /// Rolling average of the awake probability, 0.0..=1.0.
    pub average_awake: f64,
    pub reasons: Vec<String>,
}

impl ApiClient {
    /// `GET /api/health`
    pub async fn health(&self) -> Result<Health, Error> {
        self.get_json("/api/health").await
    }

    /// `GET /getSleepNotificationsEnabled` (legacy plain-text endpoint).
    pub async fn notifications_enabled(&self) -> Result<bool, Error> {
        let text = self.get_text("/getSleepNotificationsEnabled").await?;
        match text.trim() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(Error::Decode {
                message: format!("expected \"true\" or \"false\", got {other:?}"),
                body: text,
            }),
        }
    }

    /// `GET /setSleepNotificationsEnabled/<bool>` (legacy plain-text endpoint).
    ///
    /// The backend acks with an arbitrary text body; only the status matters.
    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.get_text(&format!("/setSleepNotificationsEnabled/{enabled}"))
            .await?;
        Ok(())
    }

    /// `GET /getResultAndReasons` (legacy delimited endpoint).
    pub async fn awake_status(&self) -> Result<AwakeStatus, Error> {
        let rows = self.get_rows("/getResultAndReasons", ',').await?;
        let Some(fields) = rows.into_iter().next() else {
            return Err(Error::Decode {
                message: "empty awake-status response".to_owned(),
                body: String::new(),
            });
        };

        let average_awake = fields[0].trim().parse::<f64>().map_err(|e| Error::Decode {
            message: format!("bad awake average {:?}: {e}", fields[0]),
            body: fields.join(","),
        })?;

        Ok(AwakeStatus {
            average_awake,
            reasons: fields
                .into_iter()
                .skip(1)
                .filter(|r| !r.trim().is_empty())
                .collect(),
        })
    }
}
