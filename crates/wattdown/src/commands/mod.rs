//! Subcommand handlers.

pub mod check;
pub mod config_cmd;
pub mod run;

use wattdown_core::WatchConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load and validate the full runtime config for commands that talk to
/// the backend.
pub fn load_watch_config(global: &GlobalOpts) -> Result<WatchConfig, CliError> {
    let cfg = wattdown_config::load_config(global.config.as_deref())?;
    Ok(wattdown_config::to_watch_config(&cfg)?)
}
