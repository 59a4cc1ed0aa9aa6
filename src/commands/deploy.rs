//! Default run, `--rebuild` and `--reconfigure`: converge toward the target.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy::{DeployOutcome, Deployer};
use crate::domain::{TargetState, Transition};
use crate::infra::prompt::DialoguerPrompter;
use crate::output::OutputContext;

/// Run a deploy target (EnsureRunning, ForceRebuild or Reconfigure).
///
/// # Errors
///
/// Returns an error if configuration cannot be settled or any transition
/// command fails.
pub async fn run(app: &AppContext, target: TargetState) -> Result<()> {
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
        interactive: !app.non_interactive,
    };

    let outcome = {
        let reporter = app.terminal_reporter();
        deployer.deploy(target, &reporter).await?
    };

    print_outcome(&outcome, target, &app.output);
    Ok(())
}

fn print_outcome(outcome: &DeployOutcome, target: TargetState, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    if outcome.converged() {
        ctx.info(&format!("Nothing to do: deployment is {}.", outcome.from));
    }

    if target == TargetState::Reconfigure {
        if outcome.executed.contains(&Transition::InstallService) {
            ctx.success("Service updated with the new configuration.");
        } else {
            ctx.info("Configuration saved. It takes effect on the next deploy.");
        }
        return;
    }

    ctx.success("Jupyter Lab is running.");
    ctx.url(&format!("http://localhost:{}", outcome.config.container.port));
    ctx.kv("Notebooks", &outcome.config.paths.notebooks_dir);
    ctx.kv("Status", "jupyter-deploy --status");
    ctx.kv("Stop", "jupyter-deploy --stop");
}
