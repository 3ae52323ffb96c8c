//! Config subcommand handlers.

use std::fmt::Write as _;

use wattdown_config::{Config, config_path, load_config, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "metrics_url = \"{}\"", cfg.metrics_url);
    let _ = writeln!(out, "metrics_user = \"{}\"", cfg.metrics_user);
    if cfg.metrics_password.is_some() {
        let _ = writeln!(out, "metrics_password = \"****\"");
    }
    let _ = writeln!(out, "device_pattern = \"{}\"", cfg.device_pattern);
    let _ = writeln!(out, "check_interval = \"{}\"", cfg.check_interval);
    let _ = writeln!(out, "min_watts = {}", cfg.min_watts);
    let _ = writeln!(out, "max_watts = {}", cfg.max_watts);
    let _ = writeln!(out, "standby_duration = \"{}\"", cfg.standby_duration);
    let _ = writeln!(out, "boot_grace = \"{}\"", cfg.boot_grace);
    let _ = writeln!(out, "dry_run = {}", cfg.dry_run);

    out
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.as_deref();

    match args.command {
        ConfigCommand::Init => {
            let written = save_config(&Config::default(), path)?;
            println!("wrote starter config to {}", written.display());
            println!("set the metrics password via WATTDOWN_METRICS_PASSWORD or the keyring");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load_config(path)?;
            print!("{}", format_config_redacted(&cfg));
            Ok(())
        }

        ConfigCommand::Path => {
            match path {
                Some(p) => println!("{}", p.display()),
                None => println!("{}", config_path().display()),
            }
            Ok(())
        }
    }
}
