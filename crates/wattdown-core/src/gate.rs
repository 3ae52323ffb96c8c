// ── Safety gate ──
//
// Conditions that must ALL hold before a shutoff decision is trusted.
// Evaluated in order; the first failure wins and the cycle does nothing.
// A gate failure is normal operation, not an error -- only the queries
// behind the checks can fail, and those end the cycle the same way.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::WatchConfig;
use crate::error::CoreError;
use crate::signals::Signals;

/// Grace window after the end of a print during which shutoff stays
/// suspended. Fixed as observed in production; not user-configurable yet.
pub const RECENT_PRINT_GRACE: Duration = Duration::from_secs(15 * 60);

/// The first safety condition that failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateViolation {
    /// Newest power sample older than twice the check interval.
    StaleMetrics,
    /// Relay off→on transition within the boot grace window.
    BootGrace,
    /// A printer is Running or Paused right now.
    Printing,
    /// A printer was Running or Paused within [`RECENT_PRINT_GRACE`].
    RecentPrint,
}

/// Evaluate all safety conditions, returning the first violation if any.
pub async fn evaluate(
    signals: &Signals,
    config: &WatchConfig,
    now: DateTime<Utc>,
) -> Result<Option<GateViolation>, CoreError> {
    if !signals
        .has_fresh_metrics(config.check_interval * 2, now)
        .await?
    {
        return Ok(Some(GateViolation::StaleMetrics));
    }

    if signals
        .was_power_on_recently(config.boot_grace, config.boot_thresholds, now)
        .await?
    {
        return Ok(Some(GateViolation::BootGrace));
    }

    if signals.is_printing().await? {
        return Ok(Some(GateViolation::Printing));
    }

    if signals.was_printing_within(RECENT_PRINT_GRACE).await? {
        return Ok(Some(GateViolation::RecentPrint));
    }

    Ok(None)
}
