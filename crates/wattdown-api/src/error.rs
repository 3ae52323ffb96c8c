use thiserror::Error;

/// Top-level error type for the `wattdown-api` crate.
///
/// Covers both API surfaces: the metrics backend's query endpoints and the
/// relay command endpoint. `wattdown-core` maps these into domain errors;
/// callers never take the shutoff action on any of them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Metrics backend ─────────────────────────────────────────────
    /// Non-2xx status from a query endpoint, with the response body for
    /// diagnostics.
    #[error("Metrics query failed (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// The query envelope decoded but its `status` field was not "success".
    #[error("Metrics query returned status: {status}")]
    QueryStatus { status: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Relay ───────────────────────────────────────────────────────
    /// Non-2xx status from the relay command endpoint.
    #[error("Relay command failed (HTTP {status}): {body}")]
    Relay { status: u16, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on a
    /// later cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
