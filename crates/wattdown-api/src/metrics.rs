// Metrics backend HTTP client
//
// Wraps `reqwest::Client` with query URL construction, basic auth, and
// envelope unwrapping for the Prometheus-compatible `/api/v1/query` and
// `/api/v1/query_range` endpoints. No retries live here -- the caller
// decides whether a failed query is fatal-for-this-cycle or just logged.

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::envelope::{InstantVector, QueryResponse, RangeMatrix};
use crate::error::Error;

/// Bounded timeout for every query request.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the metrics backend's query API.
///
/// Issues authenticated instant and range queries and parses the generic
/// result envelope into typed samples. All methods surface non-2xx status,
/// undecodable bodies, and non-"success" envelopes as hard errors.
#[derive(Clone)]
pub struct MetricsClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
}

impl MetricsClient {
    /// Create a new client with the default bounded-timeout HTTP client.
    pub fn new(
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self::with_client(http, base_url, username, password))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username: username.into(),
            password,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v1/{endpoint}`.
    fn endpoint_url(&self, endpoint: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/api/v1/{endpoint}")).expect("invalid query URL")
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Issue an instant query: `GET {base}/api/v1/query?query={expr}`.
    pub async fn query(&self, expr: &str) -> Result<InstantVector, Error> {
        let mut url = self.endpoint_url("query");
        url.query_pairs_mut().append_pair("query", expr);

        Ok(self.send(url).await?.into_instant())
    }

    /// Issue a range query over `[start, end]` with the given step:
    /// `GET {base}/api/v1/query_range?query={expr}&start={unix}&end={unix}&step={secs}s`.
    ///
    /// Samples in each returned series are ordered by timestamp ascending.
    pub async fn query_range(
        &self,
        expr: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<RangeMatrix, Error> {
        let mut url = self.endpoint_url("query_range");
        url.query_pairs_mut()
            .append_pair("query", expr)
            .append_pair("start", &start.timestamp().to_string())
            .append_pair("end", &end.timestamp().to_string())
            .append_pair("step", &format!("{}s", step.as_secs()));

        Ok(self.send(url).await?.into_range())
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Send an authenticated GET and decode the query envelope.
    async fn send(&self, url: Url) -> Result<QueryResponse, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: QueryResponse = serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        if envelope.status != "success" {
            return Err(Error::QueryStatus {
                status: envelope.status,
            });
        }

        debug!(result_type = %envelope.data.result_type, series = envelope.data.result.len(), "query ok");
        Ok(envelope)
    }
}
