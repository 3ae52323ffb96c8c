//! Clap derive structures for the `wattdown` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wattdown -- automatic smart-plug shutoff for idle 3D printers
#[derive(Debug, Parser)]
#[command(
    name = "wattdown",
    version,
    about = "Turn a 3D printer's smart plug off once it has been in standby long enough",
    long_about = "Watches the printer's power draw and print-job state through a\n\
        Prometheus-compatible metrics backend and turns the plug's relay off\n\
        once power has verifiably sat in the standby band for the configured\n\
        duration. Skips shutoff on stale metrics, recent power-ons, and\n\
        recent prints -- it always fails toward doing nothing.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file
    #[arg(long, env = "WATTDOWN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the watch loop
    Run(RunArgs),

    /// Evaluate one cycle and print the outcome (never switches the relay)
    Check(CheckArgs),

    /// Manage the configuration file
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Log the shutoff instead of sending it
    #[arg(long, env = "WATTDOWN_DRY_RUN")]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file
    Init,
    /// Print the effective config (password redacted)
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
