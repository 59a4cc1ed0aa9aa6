//! jupyter-deploy - one-command deployer for a containerized Jupyter Lab

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jupyter_deploy::cli::Cli;
use jupyter_deploy::domain::UsageError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<UsageError>().is_some() => {
            eprintln!("Error: {e}");
            eprintln!("Usage: jupyter-deploy [--reconfigure | --rebuild | --status | --stop]");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` for our own crate with `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,jupyter_deploy=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
