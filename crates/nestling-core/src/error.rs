// ── Core error types ──
//
// User-facing errors from nestling-core. The `From<nestling_api::Error>`
// impl translates gateway failures into the three conditions a consumer
// can meaningfully present.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The monitor backend could not be reached at all.
    #[error("monitor backend unreachable: {0}")]
    Unreachable(#[source] nestling_api::Error),

    /// The backend answered with a failure status.
    #[error("monitor backend rejected the request: {0}")]
    Rejected(#[source] nestling_api::Error),

    /// The backend answered successfully but the payload made no sense --
    /// a contract defect, worth surfacing loudly rather than retrying.
    #[error("unexpected response from the monitor backend: {0}")]
    Malformed(#[source] nestling_api::Error),
}

impl From<nestling_api::Error> for CoreError {
    fn from(err: nestling_api::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err)
        } else if err.is_network() {
            Self::Unreachable(err)
        } else {
            Self::Rejected(err)
        }
    }
}
