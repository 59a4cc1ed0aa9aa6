//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the persisted configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing setting: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot parse {}: {message}\n\nFix the file or run with --reconfigure.", .path.display())]
    Unparseable { path: PathBuf, message: String },

    #[error("Invalid configuration in {}: {reason}\n\nFix the file or run with --reconfigure.", .path.display())]
    Invalid {
        path: PathBuf,
        reason: Box<ConfigError>,
    },

    #[error("Configuration is incomplete and prompts are disabled. Run without --yes to set it up.")]
    SetupRequired,
}

// ── Transition errors ─────────────────────────────────────────────────────────

/// Errors raised while walking the deployment state chain.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("{step} failed ({code}){}", format_stderr(.stderr))]
    CommandFailed {
        step: &'static str,
        code: String,
        stderr: String,
    },

    #[error("Service is not installed. Nothing to stop.\nDeploy it first: jupyter-deploy")]
    NotInstalled,
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n\n{trimmed}")
    }
}

// ── Usage errors ──────────────────────────────────────────────────────────────

/// Errors in the command-line invocation itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("only one of {} may be given", .flags.join(", "))]
    ConflictingFlags { flags: Vec<&'static str> },
}
