//! `--status` — report deployment state without changing anything.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ServiceManager;
use crate::application::services::deploy::describe_exit;
use crate::application::services::status::{StatusReport, gather_status};
use crate::domain::{DeploymentState, UnitStatus};
use crate::output::OutputContext;

/// Lines of service log shown under the panel.
const LOG_LINES: u32 = 10;

/// Run `jupyter-deploy --status`. Never prompts.
///
/// # Errors
///
/// Returns an error if the configuration file is unreadable or a state query
/// cannot be spawned.
pub async fn run(app: &AppContext) -> Result<()> {
    let store = app.config_store();
    let units = app.unit_store();
    let report = gather_status(&store, &app.runtime, &app.services, &units).await?;

    print_panel(&report, app);

    if report.observed.service_active && !app.output.quiet {
        app.output.header("Recent logs");
        let status = app.services.show_logs(LOG_LINES).await?;
        if !status.success() {
            app.output
                .warn(&format!("journalctl failed ({})", describe_exit(status)));
        }
    }
    Ok(())
}

fn print_panel(report: &StatusReport, app: &AppContext) {
    let ctx = &app.output;
    if ctx.quiet {
        return;
    }
    let observed = &report.observed;
    ctx.header("Jupyter Lab");
    ctx.kv("State", &report.state.to_string());
    ctx.kv("Config", &app.layout.config_file.display().to_string());
    ctx.kv(
        "Image",
        &format!(
            "{} ({})",
            report.config.container.image_name,
            if observed.image_exists { "present" } else { "missing" }
        ),
    );
    ctx.kv("Unit", report.unit_summary());
    ctx.kv(
        "Service",
        if observed.service_active { "active" } else { "inactive" },
    );

    if observed.service_active {
        ctx.kv("Notebooks", &report.config.paths.notebooks_dir);
        ctx.url(&report.url());
    }

    print_hint(report, ctx);
}

fn print_hint(report: &StatusReport, ctx: &OutputContext) {
    match report.state {
        DeploymentState::Running => {}
        DeploymentState::Absent => ctx.info("Set up and start: jupyter-deploy"),
        DeploymentState::ImageBuilt if report.observed.unit == UnitStatus::Stale => {
            ctx.info("Refresh the service: jupyter-deploy");
        }
        DeploymentState::Configured
        | DeploymentState::ImageBuilt
        | DeploymentState::ServiceInstalled => ctx.info("Start: jupyter-deploy"),
    }
}
