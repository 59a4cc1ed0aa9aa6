//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::Parser;
use clap::builder::FalseyValueParser;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::{TargetFlags, TargetState};

/// Deploy a containerized Jupyter Lab with AI completion as a user service.
///
/// With no flags, brings the deployment up to Running, doing only the steps
/// that are still missing.
#[derive(Parser, Debug)]
#[command(name = "jupyter-deploy", version)]
pub struct Cli {
    /// Re-run configuration prompts (pre-filled) and refresh the service
    #[arg(long)]
    pub reconfigure: bool,

    /// Rebuild the container image even if it exists
    #[arg(long)]
    pub rebuild: bool,

    /// Show deployment state and recent logs
    #[arg(long)]
    pub status: bool,

    /// Stop the running service
    #[arg(long)]
    pub stop: bool,

    /// Never prompt; fail if configuration is required
    #[arg(short, long)]
    pub yes: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Log external commands and planning decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The target state selected by the mode flags.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::ConflictingFlags` when more than one mode flag is given.
    pub fn target(&self) -> Result<TargetState, crate::domain::UsageError> {
        TargetState::from_flags(TargetFlags {
            reconfigure: self.reconfigure,
            rebuild: self.rebuild,
            status: self.status,
            stop: self.stop,
        })
    }

    /// Execute the selected target.
    ///
    /// # Errors
    ///
    /// Returns a `UsageError` for conflicting flags, otherwise any error raised
    /// while configuring, observing or transitioning the deployment.
    pub async fn run(self) -> Result<()> {
        let target = self.target()?;
        let app = AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            yes: self.yes,
        })?;

        match target {
            TargetState::StatusOnly => commands::status::run(&app).await,
            TargetState::Stop => commands::stop::run(&app).await,
            TargetState::EnsureRunning | TargetState::ForceRebuild | TargetState::Reconfigure => {
                commands::deploy::run(&app, target).await
            }
        }
    }
}
