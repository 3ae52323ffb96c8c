// ── Watch loop ──
//
// Fixed-interval driver for the engine. One cycle runs to completion
// before the next tick fires, so cycles never overlap; a stuck query just
// delays the next tick by its bounded timeout.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::Engine;

/// Drives [`Engine::evaluate`] once immediately and then on every interval
/// tick until cancelled.
pub struct Watcher {
    engine: Engine,
    interval: Duration,
}

impl Watcher {
    pub fn new(engine: Engine, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// Run until `cancel` fires. The first evaluation happens right away.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "watch loop started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.engine.evaluate().await;
                    debug!(%outcome, "cycle finished");
                }
                () = cancel.cancelled() => {
                    info!("watch loop shutting down");
                    break;
                }
            }
        }
    }
}
