//! CLI error types with miette diagnostics.
//!
//! Maps config and startup failures into user-facing errors with
//! actionable help text. Cycle-level failures never reach this type --
//! the engine logs them and carries on.

use miette::Diagnostic;
use thiserror::Error;

use wattdown_config::ConfigError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No metrics password configured")]
    #[diagnostic(
        code(wattdown::no_password),
        help(
            "Set the WATTDOWN_METRICS_PASSWORD environment variable,\n\
             store it in the system keyring (service 'wattdown'),\n\
             or add metrics_password to the config file."
        )
    )]
    NoPassword,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wattdown::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error")]
    #[diagnostic(
        code(wattdown::config),
        help("Create a starter config with: wattdown config init")
    )]
    Config(#[source] Box<ConfigError>),

    // ── Startup ──────────────────────────────────────────────────────

    #[error("Failed to build HTTP clients")]
    #[diagnostic(code(wattdown::http))]
    Startup(#[source] wattdown_core::CoreError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoPassword => Self::NoPassword,
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoPassword => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Startup(_) => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}
