// ── Domain model ──
//
// Small typed values the decision logic trades in. Everything here is
// Copy-or-cheap and carries its own invariants; wire parsing stays in
// `wattdown-api`.

/// Print-job state as reported by the printer's gcode-state metric.
///
/// Derived from the raw numeric code: 0 idle, 1 running, 2 paused,
/// 3 completed, 4 error. Anything else maps to [`PrintState::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintState {
    Idle,
    Running,
    Paused,
    Completed,
    Error,
    Unknown,
}

impl PrintState {
    /// Map a raw metric value to a state.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_code(code: f64) -> Self {
        match code as i64 {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Completed,
            4 => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Only Running and Paused count as "printing" for all gating purposes.
    /// A paused job can resume at any moment; cutting power would ruin it.
    pub fn is_printing(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// The wattage range within which the printer is considered powered but
/// idle (standby).
///
/// Membership is strict on both ends: a reading exactly equal to
/// `min_watts` or `max_watts` is out of band, so a draw oscillating on the
/// threshold never counts toward the standby run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBand {
    pub min_watts: f64,
    pub max_watts: f64,
}

impl PowerBand {
    pub fn contains(&self, watts: f64) -> bool {
        self.min_watts < watts && watts < self.max_watts
    }
}

/// Magnitude pair for the power-on transition heuristic: a reading below
/// `low_watts` means the relay is off, a later reading above `high_watts`
/// means it was switched on.
///
/// Deliberately independent of the configured [`PowerBand`] -- the
/// heuristic detects relay state, not standby.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootThresholds {
    pub low_watts: f64,
    pub high_watts: f64,
}

impl Default for BootThresholds {
    fn default() -> Self {
        Self {
            low_watts: 5.0,
            high_watts: 10.0,
        }
    }
}

/// Current power draw plus the relay address learned from the power
/// series' labels, when the backend exposes one.
#[derive(Debug, Clone)]
pub struct PowerReading {
    pub watts: f64,
    pub relay_addr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_state_codes() {
        assert_eq!(PrintState::from_code(0.0), PrintState::Idle);
        assert_eq!(PrintState::from_code(1.0), PrintState::Running);
        assert_eq!(PrintState::from_code(2.0), PrintState::Paused);
        assert_eq!(PrintState::from_code(3.0), PrintState::Completed);
        assert_eq!(PrintState::from_code(4.0), PrintState::Error);
        assert_eq!(PrintState::from_code(7.0), PrintState::Unknown);
    }

    #[test]
    fn only_running_and_paused_are_printing() {
        assert!(PrintState::Running.is_printing());
        assert!(PrintState::Paused.is_printing());
        assert!(!PrintState::Idle.is_printing());
        assert!(!PrintState::Completed.is_printing());
        assert!(!PrintState::Error.is_printing());
        assert!(!PrintState::Unknown.is_printing());
    }

    #[test]
    fn band_membership_is_strict() {
        let band = PowerBand {
            min_watts: 7.0,
            max_watts: 9.0,
        };
        assert!(band.contains(8.0));
        assert!(!band.contains(7.0));
        assert!(!band.contains(9.0));
        assert!(!band.contains(6.9));
        assert!(!band.contains(9.1));
    }
}
