//! Observed-state query, run fresh at the start of every invocation.

use anyhow::{Context, Result};

use crate::application::ports::{ContainerRuntime, ServiceManager, UnitStore};
use crate::domain::{DeployConfig, ObservedState, UnitStatus, render_unit};

/// Query the container runtime, the installed unit and the service manager.
///
/// `config` is the configuration the unit is rendered from; when the stored
/// configuration is not ready, pass the draft or defaults and set
/// `config_ready` to `false`.
///
/// # Errors
///
/// Returns an error if a query command cannot be run or the unit file
/// cannot be read.
pub async fn observe(
    runtime: &impl ContainerRuntime,
    services: &impl ServiceManager,
    units: &impl UnitStore,
    config: &DeployConfig,
    config_ready: bool,
) -> Result<ObservedState> {
    let image_exists = runtime
        .image_exists(&config.container.image_name)
        .await
        .context("checking for the container image")?;
    let installed = units.read_installed()?;
    let unit = UnitStatus::compare(installed.as_deref(), &render_unit(config));
    let service_active = services
        .is_active()
        .await
        .context("querying the service state")?;

    let observed = ObservedState {
        config_ready,
        image_exists,
        unit,
        service_active,
    };
    tracing::debug!(?observed, state = %observed.deployment_state(), "observed system state");
    Ok(observed)
}
