//! Application context — unified state passed to every command handler.
//!
//! Owns the output context, the resolved host layout and the interactivity
//! decision, and hands out the production adapters for each port.

use anyhow::Result;

use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::TomlConfigStore;
use crate::infra::fs::{HostDirs, SystemdUnitFile};
use crate::infra::paths::HostLayout;
use crate::infra::podman::Podman;
use crate::infra::systemd::SystemdUser;
use crate::output::{OutputContext, TerminalReporter};

/// Environment variable that, like `CI`, disables prompts.
pub const YES_ENV: &str = "JUPYTER_DEPLOY_YES";

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Skip interactive prompts (also set by a truthy `CI` / `JUPYTER_DEPLOY_YES`).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Every host path the deployer touches.
    pub layout: HostLayout,
    /// When `true`, never prompt. A run that needs configuration fails with
    /// `ConfigError::SetupRequired` instead.
    pub non_interactive: bool,
    /// Podman container runtime.
    pub runtime: Podman<TokioCommandRunner>,
    /// systemd user service manager.
    pub services: SystemdUser<TokioCommandRunner>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let env_yes = env_flag("CI") || env_flag(YES_ENV);
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            layout: HostLayout::from_env()?,
            non_interactive: flags.yes || env_yes,
            runtime: Podman::default_runner(),
            services: SystemdUser::default_runner(),
        })
    }

    #[must_use]
    pub fn config_store(&self) -> TomlConfigStore {
        TomlConfigStore::new(self.layout.config_file.clone(), self.layout.home.clone())
    }

    #[must_use]
    pub fn unit_store(&self) -> SystemdUnitFile {
        SystemdUnitFile::new(self.layout.unit_file.clone())
    }

    #[must_use]
    pub fn host(&self) -> HostDirs {
        HostDirs::new(self.layout.clone())
    }

    /// Progress reporter bound to this context's output settings.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}

/// Whether an environment variable is set to a truthy value.
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| is_truthy(&v))
}

/// Empty, `0`, `false`, `no` and `off` (any case) are false; anything else is true.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !["0", "false", "no", "off"]
            .iter()
            .any(|f| value.eq_ignore_ascii_case(f))
}
