//! `wattdown check` -- one evaluation cycle, relay untouched.

use wattdown_core::Engine;

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;

pub async fn handle(_args: CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = super::load_watch_config(global)?;
    // A check never switches the relay, whatever the config says.
    config.dry_run = true;

    let mut engine = Engine::new(config).map_err(CliError::Startup)?;
    let outcome = engine.evaluate().await;

    println!("{outcome}");
    Ok(())
}
