// Hand-crafted async HTTP client for the nestling monitor backend.
//
// One response-validation and error-normalization policy for every call:
// non-2xx -> Error::Api, transport failure -> Error::Network, undecodable
// success body -> Error::Decode. No retries and no timeout enforcement
// here -- the synchronization layer above decides how to react to slow or
// failed cycles.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Explicit gateway configuration.
///
/// The base URL is passed in once at construction and never read from the
/// environment inside this crate, so the client can be pointed at a fake
/// server in tests.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the monitor backend (e.g. `http://192.168.1.50:8001`).
    pub base_url: Url,
}

/// Async client for the monitor's HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from an explicit [`GatewayConfig`].
    pub fn new(config: GatewayConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nestling/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::from_reqwest(config.base_url, http))
    }

    /// Wrap an existing `reqwest::Client` (caller manages transport settings).
    pub fn from_reqwest(base_url: Url, http: reqwest::Client) -> Self {
        Self { http, base_url }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a path (e.g. `"/api/sleep/stats"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(|e| Error::Decode {
            message: format!("invalid request path {path:?}: {e}"),
            body: String::new(),
        })
    }

    // ── JSON mode ────────────────────────────────────────────────────

    /// `GET` a JSON resource.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::decode_json(resp).await
    }

    /// `GET` a JSON resource with query parameters.
    pub(crate) async fn get_json_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::decode_json(resp).await
    }

    /// `POST` a JSON body, ignoring the response payload.
    ///
    /// Success is decided by the HTTP status alone; the `{status}` ack body
    /// the backend returns is never inspected.
    pub(crate) async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::check_status(resp)?;
        Ok(())
    }

    // ── Legacy plain-text mode ───────────────────────────────────────

    /// `GET` a plain-text resource (the monitor's pre-JSON endpoints).
    pub(crate) async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (text)");

        let resp = self.http.get(url).send().await?;
        let resp = Self::check_status(resp)?;
        Ok(resp.text().await?)
    }

    // ── Legacy delimited-row mode ────────────────────────────────────

    /// `GET` a delimited tabular resource, split into rows of fields.
    ///
    /// Blank lines are skipped; no field-level validation is performed.
    pub(crate) async fn get_rows(&self, path: &str, delimiter: char) -> Result<Vec<Vec<String>>, Error> {
        let text = self.get_text(path).await?;
        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(delimiter).map(str::to_owned).collect())
            .collect())
    }

    // ── Response handling ────────────────────────────────────────────

    fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Error::from_status(status))
        }
    }

    async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp)?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            // Clip to a char boundary; a multibyte char may straddle the cut.
            let mut cut = body.len().min(200);
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            let preview = &body[..cut];
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
