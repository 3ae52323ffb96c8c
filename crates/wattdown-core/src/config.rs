// Runtime configuration for the watch loop.
//
// Built by `wattdown-config` from TOML + env + credential resolution, or
// assembled directly in tests. Validation (band ordering, non-zero
// intervals) happens at load time, before this struct exists.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::model::{BootThresholds, PowerBand};

/// Everything the engine needs to run: backend connection, device filter,
/// thresholds, and pacing.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Metrics backend base URL.
    pub metrics_url: Url,

    /// Basic-auth user for the metrics backend.
    pub metrics_user: String,

    /// Basic-auth password for the metrics backend.
    pub metrics_password: SecretString,

    /// Backend-side regular expression matching the plug's `device_name`
    /// label. A loose pattern may match several devices; the first series
    /// returned wins.
    pub device_pattern: String,

    /// Evaluation cycle interval.
    pub check_interval: Duration,

    /// Standby wattage band.
    pub band: PowerBand,

    /// How long power must sit continuously in the band before shutoff.
    pub standby_duration: Duration,

    /// Suspend shutoff logic for this long after a detected power-on.
    pub boot_grace: Duration,

    /// Relay-off/on magnitudes for the power-on heuristic.
    pub boot_thresholds: BootThresholds,

    /// Log the shutoff instead of sending it.
    pub dry_run: bool,
}
