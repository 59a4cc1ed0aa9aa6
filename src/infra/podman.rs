//! Podman adapter — routes container runtime calls through a `CommandRunner`.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ContainerRuntime};
use crate::infra::command_runner::TokioCommandRunner;

const PODMAN: &str = "podman";

/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct Podman<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Podman<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl Podman<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> ContainerRuntime for Podman<R> {
    async fn image_exists(&self, image: &str) -> Result<bool> {
        let output = self
            .runner
            .run(PODMAN, &["image", "exists", image])
            .await?;
        // 0 = present, 1 = absent, anything else is podman failing.
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(anyhow::anyhow!(
                    "podman image exists failed ({}): {}",
                    output.status,
                    stderr.trim()
                ))
            }
        }
    }

    async fn build(&self, image: &str, context: &Path) -> Result<Output> {
        let context = context
            .to_str()
            .context("build context path is not valid UTF-8")?;
        self.runner
            .run(PODMAN, &["build", "-t", image, context])
            .await
    }
}
