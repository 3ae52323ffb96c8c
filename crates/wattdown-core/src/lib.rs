//! Standby detection and shutoff decision logic.
//!
//! This crate owns everything between the raw metric samples and the relay
//! command:
//!
//! - **[`Signals`]** -- typed signal extraction over the metrics backend:
//!   current power draw (plus the relay address learned from labels),
//!   print state now, print state within a lookback window, and metric
//!   freshness.
//!
//! - **[`standby`]** -- the one non-trivial algorithm in the system: the
//!   backward-scan that measures how long power has continuously sat inside
//!   the standby band, and the low→high transition heuristic that detects a
//!   recent power-on. Both are pure routines over sample slices so they can
//!   be tested without a backend.
//!
//! - **[`gate`]** -- the safety conditions that must all hold before a
//!   shutoff decision is trusted. Any failure means "do nothing this cycle".
//!
//! - **[`Engine`]** -- one evaluation cycle: power fetch, gate, band check,
//!   standby duration, and finally the relay command. Never panics, never
//!   returns an error upward; every terminal outcome is an [`Outcome`].
//!
//! All durations are derived from queryable history on every cycle. There
//! are no in-process timers to lose on restart -- the only state carried
//! between cycles is the cached relay address.

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod model;
pub mod signals;
pub mod standby;
pub mod watcher;

pub use config::WatchConfig;
pub use engine::{Engine, Outcome};
pub use error::CoreError;
pub use gate::GateViolation;
pub use model::{BootThresholds, PowerBand, PowerReading, PrintState};
pub use signals::Signals;
pub use watcher::Watcher;
