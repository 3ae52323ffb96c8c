// ── Signal extraction ──
//
// Thin async facade over `MetricsClient` that turns raw query results into
// the typed signals the gate and engine consume. Query expressions and
// label names are centralized here; nothing else in the crate builds
// PromQL.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use wattdown_api::MetricsClient;

use crate::error::CoreError;
use crate::model::{BootThresholds, PowerBand, PowerReading, PrintState};
use crate::standby::{longest_in_band_suffix, power_on_transition};

/// Power draw of the smart plug, labelled with `device_name` and (when the
/// exporter knows it) `ip_address`.
pub const POWER_METRIC: &str = "shelly_watts";

/// Print-job state across all known printers, labelled with `printer`.
pub const GCODE_STATE_METRIC: &str = "printer_gcode_state";

const IP_LABEL: &str = "ip_address";
const PRINTER_LABEL: &str = "printer";

/// Fixed range-query step. The suffix scan tolerates missing samples, so a
/// coarser scrape interval only costs resolution, not correctness.
const QUERY_STEP: Duration = Duration::from_secs(60);

/// Extra lookback on the standby range query to tolerate query-step
/// misalignment at the window edge.
const RANGE_BUFFER: Duration = Duration::from_secs(5 * 60);

/// Typed signal extraction over the metrics backend.
pub struct Signals {
    metrics: MetricsClient,
    device_pattern: String,
}

impl Signals {
    pub fn new(metrics: MetricsClient, device_pattern: impl Into<String>) -> Self {
        Self {
            metrics,
            device_pattern: device_pattern.into(),
        }
    }

    /// The power series filtered to the configured plug.
    fn power_expr(&self) -> String {
        format!("{POWER_METRIC}{{device_name=~\"{}\"}}", self.device_pattern)
    }

    /// Current power draw and the plug's network address.
    ///
    /// Zero matching series is a hard error -- without a reading there is
    /// nothing to decide on. When several devices match the pattern, the
    /// first series returned wins (backend order, not deterministic).
    pub async fn current_power(&self) -> Result<PowerReading, CoreError> {
        let result = self
            .metrics
            .query(&self.power_expr())
            .await
            .map_err(CoreError::Metrics)?;

        let series = result.first().ok_or_else(|| CoreError::NoMatchingDevice {
            pattern: self.device_pattern.clone(),
        })?;

        let relay_addr = series.labels.get(IP_LABEL).cloned();
        if let Some(ref addr) = relay_addr {
            debug!(%addr, "plug device found");
        }

        Ok(PowerReading {
            watts: series.sample.value,
            relay_addr,
        })
    }

    /// Whether any printer currently reports Running or Paused.
    pub async fn is_printing(&self) -> Result<bool, CoreError> {
        let result = self
            .metrics
            .query(GCODE_STATE_METRIC)
            .await
            .map_err(CoreError::Metrics)?;

        for series in &result.series {
            let state = PrintState::from_code(series.sample.value);
            if state.is_printing() {
                let printer = series
                    .labels
                    .get(PRINTER_LABEL)
                    .map_or("unknown", String::as_str);
                debug!(printer, ?state, "printer busy");
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Whether any printer was Running or Paused within the trailing
    /// `lookback` window, via a rolling-max over the state codes. Catches a
    /// print that finished moments ago.
    pub async fn was_printing_within(&self, lookback: Duration) -> Result<bool, CoreError> {
        let expr = format!(
            "max_over_time({GCODE_STATE_METRIC}[{}s])",
            lookback.as_secs()
        );
        let result = self.metrics.query(&expr).await.map_err(CoreError::Metrics)?;

        Ok(result
            .series
            .iter()
            .any(|s| PrintState::from_code(s.sample.value).is_printing()))
    }

    /// Whether the newest power sample is no older than `within`.
    ///
    /// An empty result is "not fresh", never an error -- missing data must
    /// fail safe toward inaction.
    pub async fn has_fresh_metrics(
        &self,
        within: Duration,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let result = self
            .metrics
            .query(&self.power_expr())
            .await
            .map_err(CoreError::Metrics)?;

        let Some(series) = result.first() else {
            return Ok(false);
        };

        // A future-dated sample (clock skew) counts as fresh.
        let age = (now - series.sample.timestamp).to_std().unwrap_or_default();
        Ok(age <= within)
    }

    /// How long power has continuously sat strictly inside `band`, derived
    /// from a range query over `max_duration` plus a small buffer.
    pub async fn standby_duration(
        &self,
        band: PowerBand,
        max_duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Duration, CoreError> {
        let start = now - to_chrono(max_duration + RANGE_BUFFER);
        let result = self
            .metrics
            .query_range(&self.power_expr(), start, now, QUERY_STEP)
            .await
            .map_err(CoreError::Metrics)?;

        let Some(series) = result.first() else {
            return Ok(Duration::ZERO);
        };

        Ok(longest_in_band_suffix(&series.samples, band, now))
    }

    /// Whether a relay off→on transition shows up in the power series
    /// within `lookback` (plus one query step of slack).
    pub async fn was_power_on_recently(
        &self,
        lookback: Duration,
        thresholds: BootThresholds,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let start = now - to_chrono(lookback + QUERY_STEP);
        let result = self
            .metrics
            .query_range(&self.power_expr(), start, now, QUERY_STEP)
            .await
            .map_err(CoreError::Metrics)?;

        let Some(series) = result.first() else {
            return Ok(false);
        };

        Ok(power_on_transition(&series.samples, thresholds))
    }
}

fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::zero())
}
