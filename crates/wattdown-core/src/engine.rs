// ── Decision engine ──
//
// One evaluation cycle per call. Outcomes are evaluated, not stored; the
// only state carried across cycles is the cached relay address. Every
// terminal outcome is logged with enough context to debug a skipped or
// taken shutoff from the journal alone, and none of them propagate an
// error upward -- a failed cycle is a no-op cycle.

use std::fmt;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use wattdown_api::{MetricsClient, RelayClient};

use crate::config::WatchConfig;
use crate::error::CoreError;
use crate::gate::{self, GateViolation};
use crate::signals::Signals;

/// Terminal outcome of one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The power query failed or another query errored mid-cycle.
    SkipOffline,
    /// Metrics exist but the newest sample is too old to trust.
    SkipStaleMetrics,
    /// The printer was powered on within the boot grace window.
    SkipBootGrace,
    /// A print job is running or paused.
    SkipPrinting,
    /// A print job finished too recently.
    SkipRecentPrint,
    /// Current draw is outside the standby band.
    SkipOutOfBand,
    /// In band, but not for long enough yet.
    SkipStillCounting,
    /// Standby threshold reached; the relay command was issued (or logged
    /// in dry-run mode).
    ShutOff,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SkipOffline => "skip: metrics unavailable",
            Self::SkipStaleMetrics => "skip: metrics stale",
            Self::SkipBootGrace => "skip: boot grace period",
            Self::SkipPrinting => "skip: printing",
            Self::SkipRecentPrint => "skip: printed recently",
            Self::SkipOutOfBand => "skip: power outside standby band",
            Self::SkipStillCounting => "skip: standby threshold not reached",
            Self::ShutOff => "shut off",
        };
        f.write_str(label)
    }
}

/// Drives one evaluation cycle: power fetch, safety gate, band check,
/// standby duration, relay command.
pub struct Engine {
    signals: Signals,
    relay: RelayClient,
    config: WatchConfig,
    /// Relay address learned from metric labels. Survives cycles but not
    /// restarts; re-learned on the next successful power query.
    relay_addr: Option<String>,
}

impl Engine {
    /// Build the engine and its HTTP clients from a validated config.
    pub fn new(config: WatchConfig) -> Result<Self, CoreError> {
        let metrics = MetricsClient::new(
            config.metrics_url.clone(),
            config.metrics_user.clone(),
            config.metrics_password.clone(),
        )
        .map_err(CoreError::Metrics)?;
        let relay = RelayClient::new(config.dry_run).map_err(CoreError::Relay)?;
        Ok(Self::with_clients(metrics, relay, config))
    }

    /// Build the engine around pre-built clients (tests, custom TLS).
    pub fn with_clients(metrics: MetricsClient, relay: RelayClient, config: WatchConfig) -> Self {
        let signals = Signals::new(metrics, config.device_pattern.clone());
        Self {
            signals,
            relay,
            config,
            relay_addr: None,
        }
    }

    /// The most recently learned relay address, if any.
    pub fn relay_addr(&self) -> Option<&str> {
        self.relay_addr.as_deref()
    }

    /// Run one full evaluation cycle.
    pub async fn evaluate(&mut self) -> Outcome {
        let now = Utc::now();
        debug!("checking printer and power status");

        // 1. Current draw + relay address. Without a reading there is
        //    nothing to decide on.
        let reading = match self.signals.current_power().await {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %e, "power query failed");
                return Outcome::SkipOffline;
            }
        };
        if let Some(addr) = reading.relay_addr {
            self.relay_addr = Some(addr);
        }

        // 2. Safety conditions, first failure wins.
        let violation = match gate::evaluate(&self.signals, &self.config, now).await {
            Ok(violation) => violation,
            Err(e) => {
                warn!(error = %e, "safety gate query failed");
                return Outcome::SkipOffline;
            }
        };
        if let Some(violation) = violation {
            return self.log_violation(violation);
        }

        info!(watts = reading.watts, "printer idle");

        // 3. Instantaneous band membership.
        if !self.config.band.contains(reading.watts) {
            info!(
                watts = reading.watts,
                min_watts = self.config.band.min_watts,
                max_watts = self.config.band.max_watts,
                "power outside standby band"
            );
            return Outcome::SkipOutOfBand;
        }

        // 4. History-derived standby duration vs. threshold.
        let standby = match self
            .signals
            .standby_duration(self.config.band, self.config.standby_duration, now)
            .await
        {
            Ok(standby) => standby,
            Err(e) => {
                warn!(error = %e, "standby duration query failed");
                return Outcome::SkipOffline;
            }
        };

        if standby < self.config.standby_duration {
            let remaining = self.config.standby_duration - standby;
            info!(
                standby_secs = standby.as_secs(),
                remaining_secs = remaining.as_secs(),
                "in standby, waiting for threshold"
            );
            return Outcome::SkipStillCounting;
        }

        // 5. Shut off.
        info!(
            standby_secs = standby.as_secs(),
            threshold_secs = self.config.standby_duration.as_secs(),
            "standby threshold reached, turning relay off"
        );
        match self.relay_addr.as_deref() {
            None => error!("no relay address learned from metrics, cannot act"),
            Some(addr) => match self.relay.turn_off(addr).await {
                Ok(()) => info!(%addr, "relay turned off"),
                Err(e) => error!(error = %e, %addr, "relay command failed"),
            },
        }
        Outcome::ShutOff
    }

    fn log_violation(&self, violation: GateViolation) -> Outcome {
        match violation {
            GateViolation::StaleMetrics => {
                warn!(
                    max_age_secs = (self.config.check_interval * 2).as_secs(),
                    "no recent power metrics, skipping relay control for safety"
                );
                Outcome::SkipStaleMetrics
            }
            GateViolation::BootGrace => {
                info!(
                    boot_grace_secs = self.config.boot_grace.as_secs(),
                    "printer powered on within boot grace period"
                );
                Outcome::SkipBootGrace
            }
            GateViolation::Printing => {
                info!("printer is currently printing");
                Outcome::SkipPrinting
            }
            GateViolation::RecentPrint => {
                info!(
                    grace_secs = gate::RECENT_PRINT_GRACE.as_secs(),
                    "printer was printing recently, waiting"
                );
                Outcome::SkipRecentPrint
            }
        }
    }
}
