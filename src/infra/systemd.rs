//! systemd user-manager adapter for the deployer's unit.

use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{CommandRunner, ServiceManager};
use crate::domain::deployment::UNIT_NAME;
use crate::infra::command_runner::TokioCommandRunner;

const SYSTEMCTL: &str = "systemctl";
const JOURNALCTL: &str = "journalctl";

/// Routes all `systemctl --user` and `journalctl --user` calls through a
/// `CommandRunner`.
pub struct SystemdUser<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SystemdUser<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn systemctl(&self, verb: &str) -> Result<Output> {
        self.runner
            .run(SYSTEMCTL, &["--user", verb, UNIT_NAME])
            .await
    }
}

impl SystemdUser<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> ServiceManager for SystemdUser<R> {
    async fn is_active(&self) -> Result<bool> {
        // Any non-zero exit means not active (inactive, failed, unknown).
        Ok(self.systemctl("is-active").await?.status.success())
    }

    async fn daemon_reload(&self) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["--user", "daemon-reload"]).await
    }

    async fn enable(&self) -> Result<Output> {
        self.systemctl("enable").await
    }

    async fn start(&self) -> Result<Output> {
        self.systemctl("start").await
    }

    async fn stop(&self) -> Result<Output> {
        self.systemctl("stop").await
    }

    async fn restart(&self) -> Result<Output> {
        self.systemctl("restart").await
    }

    async fn show_logs(&self, lines: u32) -> Result<ExitStatus> {
        let lines = lines.to_string();
        self.runner
            .run_status(
                JOURNALCTL,
                &["--user", "-u", UNIT_NAME, "-n", &lines, "--no-pager"],
            )
            .await
    }
}
