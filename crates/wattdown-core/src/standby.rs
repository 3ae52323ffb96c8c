// ── Standby window analysis ──
//
// Pure routines over sample slices. The backend's range-query step is
// fixed (60s), but samples may be missing or irregularly spaced -- both
// routines only care about order, never about spacing.

use std::time::Duration;

use chrono::{DateTime, Utc};

use wattdown_api::Sample;

use crate::model::{BootThresholds, PowerBand};

/// Duration of the maximal contiguous suffix of `samples` (ordered by
/// timestamp ascending) whose every value lies strictly inside `band`.
///
/// Scans backwards from the newest sample; the first out-of-band value
/// breaks the run. Returns `now - run_start`, or zero when the series is
/// empty or the newest sample is already out of band.
pub fn longest_in_band_suffix(samples: &[Sample], band: PowerBand, now: DateTime<Utc>) -> Duration {
    let mut run_start: Option<DateTime<Utc>> = None;

    for sample in samples.iter().rev() {
        if band.contains(sample.value) {
            run_start = Some(sample.timestamp);
        } else {
            break;
        }
    }

    match run_start {
        // Negative (future-dated run start) clamps to zero.
        Some(start) => (now - start).to_std().unwrap_or_default(),
        None => Duration::ZERO,
    }
}

/// Whether `samples` contain a relay off→on transition: a reading below
/// `thresholds.low_watts` followed (not necessarily adjacently) by one
/// above `thresholds.high_watts`.
pub fn power_on_transition(samples: &[Sample], thresholds: BootThresholds) -> bool {
    let mut seen_low = false;

    for sample in samples {
        if sample.value < thresholds.low_watts {
            seen_low = true;
        } else if seen_low && sample.value > thresholds.high_watts {
            return true;
        }
    }

    false
}
