//! Application service — status use-case. Read-only: never prompts, never
//! runs a transition.

use anyhow::Result;

use crate::application::ports::{ConfigStore, ContainerRuntime, ServiceManager, UnitStore};
use crate::application::services::observe::observe;
use crate::application::services::setup::peek_config;
use crate::domain::{DeployConfig, DeploymentState, ObservedState, UnitStatus};

/// Everything the status view shows.
#[derive(Debug)]
pub struct StatusReport {
    pub observed: ObservedState,
    pub state: DeploymentState,
    /// Configuration used for the comparison (defaults when not configured).
    pub config: DeployConfig,
}

impl StatusReport {
    /// Local URL of the notebook server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.container.port)
    }

    /// Unit file summary. Freshness is only judged against a stored config.
    #[must_use]
    pub fn unit_summary(&self) -> &'static str {
        match self.observed.unit {
            UnitStatus::Missing => "not installed",
            UnitStatus::Stale if self.observed.config_ready => "installed (out of date)",
            UnitStatus::Stale | UnitStatus::Current => "installed",
        }
    }
}

/// Gather the observed state without changing anything.
///
/// # Errors
///
/// Returns an error if the stored configuration is unreadable or a query
/// command cannot be run.
pub async fn gather_status(
    store: &impl ConfigStore,
    runtime: &impl ContainerRuntime,
    services: &impl ServiceManager,
    units: &impl UnitStore,
) -> Result<StatusReport> {
    let (config, ready) = peek_config(store)?;
    let observed = observe(runtime, services, units, &config, ready).await?;
    Ok(StatusReport {
        state: observed.deployment_state(),
        observed,
        config,
    })
}
