//! `wattdown run` -- the watch loop.

use tokio_util::sync::CancellationToken;
use tracing::info;

use wattdown_core::{Engine, Watcher};

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = super::load_watch_config(global)?;
    if args.dry_run {
        config.dry_run = true;
    }

    info!(
        metrics_url = %config.metrics_url,
        device_pattern = %config.device_pattern,
        check_interval = %humantime::format_duration(config.check_interval),
        min_watts = config.band.min_watts,
        max_watts = config.band.max_watts,
        standby_duration = %humantime::format_duration(config.standby_duration),
        boot_grace = %humantime::format_duration(config.boot_grace),
        dry_run = config.dry_run,
        "starting wattdown"
    );

    let interval = config.check_interval;
    let engine = Engine::new(config).map_err(CliError::Startup)?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            signal_cancel.cancel();
        }
    });

    Watcher::new(engine, interval).run(cancel).await;
    Ok(())
}
