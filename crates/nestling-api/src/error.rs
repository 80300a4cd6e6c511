use thiserror::Error;

/// Top-level error type for the `nestling-api` crate.
///
/// Every call through the gateway fails with exactly one of these three
/// shapes. Callers decide success vs failure by this signal alone -- never
/// by inspecting response bodies.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never reached the server, or the response never arrived
    /// (connection refused, DNS failure, reset mid-body, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded with a non-success HTTP status.
    #[error("API error (HTTP {status}): {status_text}")]
    Api { status: u16, status_text: String },

    /// A success response body did not match the expected shape.
    ///
    /// Treated as a defect in either side of the contract, not a transient
    /// condition -- the gateway never retries these.
    #[error("decode error: {message}")]
    Decode { message: String, body: String },
}

impl Error {
    /// Build an [`Error::Api`] from a status code, attaching the canonical
    /// reason phrase as the status text.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Api {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_owned(),
        }
    }

    /// Returns `true` if the request failed before a response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// The HTTP status code, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Decode { .. } => None,
        }
    }

    /// Returns `true` for body-shape mismatches, which indicate a contract
    /// defect rather than a transient failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
