// ── Core error types ──
//
// Cycle-level failures from the decision logic. Consumers never see raw
// HTTP details except through the wrapped source; every variant here is
// logged at the cycle boundary and results in inaction, never a shutoff.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A metrics query failed (transport, status, or envelope).
    #[error("metrics query failed: {0}")]
    Metrics(#[source] wattdown_api::Error),

    /// The power query matched no device series at all.
    #[error("no power series matching pattern '{pattern}'")]
    NoMatchingDevice { pattern: String },

    /// Shutoff was decided but no relay address has been learned yet.
    #[error("no relay address learned from metrics")]
    NoRelayAddress,

    /// The relay command failed.
    #[error("relay command failed: {0}")]
    Relay(#[source] wattdown_api::Error),
}
