//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{DeployConfig, LoadedConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// A non-zero exit is not an error: callers inspect `Output::status`. Only a
/// failure to spawn or wait for the process is reported as `Err`.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Collaborator Ports ────────────────────────────────────────────────────────

/// Container runtime operations (Podman).
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Whether an image with this name exists locally.
    async fn image_exists(&self, image: &str) -> Result<bool>;
    /// Build `image` from the build context directory.
    async fn build(&self, image: &str, context: &Path) -> Result<Output>;
}

/// Service manager operations on the deployer's unit (systemd user manager).
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Whether the unit is currently active.
    async fn is_active(&self) -> Result<bool>;
    async fn daemon_reload(&self) -> Result<Output>;
    async fn enable(&self) -> Result<Output>;
    async fn start(&self) -> Result<Output>;
    async fn stop(&self) -> Result<Output>;
    async fn restart(&self) -> Result<Output>;
    /// Print the last `lines` journal entries of the unit to the terminal.
    async fn show_logs(&self, lines: u32) -> Result<ExitStatus>;
}

// ── State and Filesystem Ports ────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, filling and re-persisting defaults.
    fn load(&self) -> Result<LoadedConfig>;
    /// Persist the complete configuration atomically.
    fn save(&self, config: &DeployConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> PathBuf;
}

/// Abstracts the installed unit file.
pub trait UnitStore {
    /// Content of the installed unit, or `None` when not installed.
    fn read_installed(&self) -> Result<Option<String>>;
    /// Atomically replace the installed unit.
    fn install(&self, content: &str) -> Result<()>;
    /// Location of the unit file.
    fn path(&self) -> PathBuf;
}

/// Abstracts host preparation done before the service is installed.
pub trait HostSetup {
    /// Create the directories mounted into the container and seed the
    /// notebook-server configuration files that are not present yet.
    fn prepare(&self, config: &DeployConfig) -> Result<()>;

    /// Extract the container build context to a temporary directory.
    ///
    /// Returns `(path, guard)`; the directory is removed when `guard` is
    /// dropped.
    fn build_context(&self) -> Result<(PathBuf, Box<dyn std::any::Any>)>;
}

/// Interactive collection of configuration values.
pub trait Prompter {
    /// Ask for every setting, offering the values in `draft` as defaults.
    fn prompt(&self, draft: &DeployConfig) -> Result<DeployConfig>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
