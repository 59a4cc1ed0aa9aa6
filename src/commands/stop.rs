//! `--stop` — stop the service, keeping image, unit and configuration.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy::{Deployer, StopOutcome};
use crate::infra::prompt::DialoguerPrompter;

/// Run `jupyter-deploy --stop`.
///
/// # Errors
///
/// Returns `TransitionError::NotInstalled` when no unit is installed, or an
/// error if `systemctl stop` fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let store = app.config_store();
    let units = app.unit_store();
    let host = app.host();
    let deployer = Deployer {
        runtime: &app.runtime,
        services: &app.services,
        store: &store,
        units: &units,
        host: &host,
        prompter: &DialoguerPrompter,
        interactive: false,
    };

    let outcome = {
        let reporter = app.terminal_reporter();
        deployer.stop(&reporter).await?
    };

    let ctx = &app.output;
    match outcome {
        StopOutcome::AlreadyStopped => ctx.info("Jupyter Lab is already stopped."),
        StopOutcome::Stopped => ctx.success("Jupyter Lab stopped. Notebooks are preserved."),
    }
    ctx.info("Start again: jupyter-deploy");
    Ok(())
}
