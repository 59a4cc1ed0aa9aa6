//! Application service — deployment orchestrator.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every run observes state from scratch, plans the transitions for the
//! requested target and executes them in order. The first failing command
//! aborts the walk; nothing is retried.

use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{
    ConfigStore, ContainerRuntime, HostSetup, ProgressReporter, Prompter, ServiceManager,
    UnitStore,
};
use crate::application::services::observe::observe;
use crate::application::services::setup::settle_config;
use crate::domain::{
    DeployConfig, DeploymentState, TargetState, Transition, TransitionError, plan, plan_stop,
    render_unit,
};

/// Collaborators the orchestrator drives. All fields are borrowed so the
/// caller can inject real or mock implementations.
pub struct Deployer<'a, Rt, Sm, Cs, Us, Hs, Pr> {
    pub runtime: &'a Rt,
    pub services: &'a Sm,
    pub store: &'a Cs,
    pub units: &'a Us,
    pub host: &'a Hs,
    pub prompter: &'a Pr,
    /// When `false`, a run that needs prompts fails instead.
    pub interactive: bool,
}

/// Outcome of a deploy run.
#[derive(Debug)]
pub struct DeployOutcome {
    /// Chain position observed once configuration was settled, before any
    /// transition ran.
    pub from: DeploymentState,
    /// Whether the interactive setup ran and saved a new configuration.
    pub configured: bool,
    /// Transitions executed, in order.
    pub executed: Vec<Transition>,
    /// Configuration the run converged on.
    pub config: DeployConfig,
}

impl DeployOutcome {
    /// `true` when the run changed nothing.
    #[must_use]
    pub fn converged(&self) -> bool {
        !self.configured && self.executed.is_empty()
    }
}

/// Outcome of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
}

impl<Rt, Sm, Cs, Us, Hs, Pr> Deployer<'_, Rt, Sm, Cs, Us, Hs, Pr>
where
    Rt: ContainerRuntime,
    Sm: ServiceManager,
    Cs: ConfigStore,
    Us: UnitStore,
    Hs: HostSetup,
    Pr: Prompter,
{
    /// Converge towards `EnsureRunning`, `ForceRebuild` or `Reconfigure`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration cannot be settled, or a
    /// `TransitionError` for the first transition that fails.
    pub async fn deploy(
        &self,
        target: TargetState,
        reporter: &impl ProgressReporter,
    ) -> Result<DeployOutcome> {
        anyhow::ensure!(
            target.requires_config(),
            "{target:?} is not a deploy target"
        );

        let settled = settle_config(
            self.store,
            self.prompter,
            reporter,
            self.interactive,
            target == TargetState::Reconfigure,
        )?;
        let config = settled.config;

        let observed = observe(self.runtime, self.services, self.units, &config, true).await?;
        let from = observed.deployment_state();

        let steps = plan(target, &observed);
        tracing::info!(?target, %from, ?steps, "planned transitions");

        for step in &steps {
            self.execute(*step, &config, reporter).await?;
        }

        Ok(DeployOutcome {
            from,
            configured: settled.configured,
            executed: steps,
            config,
        })
    }

    /// Stop the service if it is installed and active.
    ///
    /// The unit file is checked on disk before any external command runs.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotInstalled`] when no unit is installed,
    /// or a `TransitionError` when the stop command fails.
    pub async fn stop(&self, reporter: &impl ProgressReporter) -> Result<StopOutcome> {
        if self.units.read_installed()?.is_none() {
            return Err(TransitionError::NotInstalled.into());
        }
        let steps = plan_stop(true, self.services.is_active().await?);
        tracing::info!(?steps, "planned stop");
        if steps.is_empty() {
            return Ok(StopOutcome::AlreadyStopped);
        }
        for step in steps {
            self.execute_service(step, reporter).await?;
        }
        Ok(StopOutcome::Stopped)
    }

    async fn execute(
        &self,
        step: Transition,
        config: &DeployConfig,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        tracing::info!(step = step.label(), "executing transition");
        match step {
            Transition::BuildImage => {
                reporter.step(&format!(
                    "building image {}...",
                    config.container.image_name
                ));
                let (context, _guard) = self.host.build_context()?;
                let output = self
                    .runtime
                    .build(&config.container.image_name, &context)
                    .await?;
                check(step, &output)?;
                reporter.success("image built");
            }
            Transition::InstallService => {
                reporter.step("installing service...");
                self.host.prepare(config)?;
                self.units.install(&render_unit(config))?;
                check(step, &self.services.daemon_reload().await?)?;
                check(step, &self.services.enable().await?)?;
                reporter.success(&format!("unit installed at {}", self.units.path().display()));
            }
            Transition::StartService | Transition::RestartService | Transition::StopService => {
                self.execute_service(step, reporter).await?;
            }
        }
        Ok(())
    }

    /// Run the `systemctl` lifecycle verb behind a service transition.
    async fn execute_service(
        &self,
        step: Transition,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        let (doing, done, output): (
            &str,
            &str,
            std::pin::Pin<Box<dyn std::future::Future<Output = Result<Output>> + '_>>,
        ) = match step {
            Transition::StartService => (
                "starting service...",
                "service started",
                Box::pin(self.services.start()),
            ),
            Transition::RestartService => (
                "restarting service...",
                "service restarted",
                Box::pin(self.services.restart()),
            ),
            Transition::StopService => (
                "stopping service...",
                "service stopped",
                Box::pin(self.services.stop()),
            ),
            Transition::BuildImage | Transition::InstallService => {
                anyhow::bail!("{} is not a service lifecycle step", step.label())
            }
        };
        reporter.step(doing);
        check(step, &output.await?)?;
        reporter.success(done);
        Ok(())
    }
}

/// Turn a non-zero exit into a `TransitionError` carrying stderr.
fn check(step: Transition, output: &Output) -> Result<(), TransitionError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    tracing::warn!(step = step.label(), status = %output.status, "transition command failed");
    Err(TransitionError::CommandFailed {
        step: step.label(),
        code: describe_exit(output.status),
        stderr,
    })
}

/// Human description of an exit status.
#[must_use]
pub fn describe_exit(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
