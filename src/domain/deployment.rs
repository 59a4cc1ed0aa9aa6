//! Deployment state chain, target states and transition planning.
//!
//! Pure functions only. The orchestrator in `application::services::deploy`
//! feeds an [`ObservedState`] into [`plan`] and executes what comes back.

use std::fmt;

use crate::domain::error::UsageError;

/// systemd user unit managed by the deployer.
pub const UNIT_NAME: &str = "jupyter-lab.service";

/// Name of the running container.
pub const CONTAINER_NAME: &str = "jupyter-lab";

// ── Target state ─────────────────────────────────────────────────────────────

/// What the user asked for in this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    EnsureRunning,
    ForceRebuild,
    Reconfigure,
    StatusOnly,
    Stop,
}

/// Raw mode flags as parsed from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetFlags {
    pub reconfigure: bool,
    pub rebuild: bool,
    pub status: bool,
    pub stop: bool,
}

impl TargetState {
    /// Map command-line flags to exactly one target.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConflictingFlags`] when more than one flag is set.
    pub fn from_flags(flags: TargetFlags) -> Result<Self, UsageError> {
        let set: Vec<(&'static str, TargetState)> = [
            (flags.reconfigure, "--reconfigure", TargetState::Reconfigure),
            (flags.rebuild, "--rebuild", TargetState::ForceRebuild),
            (flags.status, "--status", TargetState::StatusOnly),
            (flags.stop, "--stop", TargetState::Stop),
        ]
        .into_iter()
        .filter(|(on, ..)| *on)
        .map(|(_, flag, target)| (flag, target))
        .collect();

        match set.as_slice() {
            [] => Ok(TargetState::EnsureRunning),
            [(_, target)] => Ok(*target),
            _ => Err(UsageError::ConflictingFlags {
                flags: set.iter().map(|(flag, _)| *flag).collect(),
            }),
        }
    }

    /// Whether this target needs a complete configuration before planning.
    #[must_use]
    pub fn requires_config(self) -> bool {
        matches!(
            self,
            TargetState::EnsureRunning | TargetState::ForceRebuild | TargetState::Reconfigure
        )
    }
}

// ── Observed state ───────────────────────────────────────────────────────────

/// Installed unit file compared against the freshly rendered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Missing,
    Stale,
    Current,
}

impl UnitStatus {
    /// Compare the on-disk unit (if any) with the rendered content.
    #[must_use]
    pub fn compare(installed: Option<&str>, rendered: &str) -> Self {
        match installed {
            None => UnitStatus::Missing,
            Some(text) if text == rendered => UnitStatus::Current,
            Some(_) => UnitStatus::Stale,
        }
    }

    #[must_use]
    pub fn is_installed(self) -> bool {
        self != UnitStatus::Missing
    }
}

/// Snapshot of the outside world, taken fresh at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedState {
    pub config_ready: bool,
    pub image_exists: bool,
    pub unit: UnitStatus,
    pub service_active: bool,
}

/// Position on the deployment chain. Ordered: each state implies the ones
/// before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeploymentState {
    Absent,
    Configured,
    ImageBuilt,
    ServiceInstalled,
    Running,
}

impl DeploymentState {
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            DeploymentState::Absent => Some(DeploymentState::Configured),
            DeploymentState::Configured => Some(DeploymentState::ImageBuilt),
            DeploymentState::ImageBuilt => Some(DeploymentState::ServiceInstalled),
            DeploymentState::ServiceInstalled => Some(DeploymentState::Running),
            DeploymentState::Running => None,
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentState::Absent => "not configured",
            DeploymentState::Configured => "configured",
            DeploymentState::ImageBuilt => "image built",
            DeploymentState::ServiceInstalled => "service installed",
            DeploymentState::Running => "running",
        };
        f.write_str(s)
    }
}

impl ObservedState {
    /// The longest prefix of the chain satisfied by the observed facts.
    #[must_use]
    pub fn deployment_state(&self) -> DeploymentState {
        if !self.config_ready {
            DeploymentState::Absent
        } else if !self.image_exists {
            DeploymentState::Configured
        } else if self.unit != UnitStatus::Current {
            DeploymentState::ImageBuilt
        } else if !self.service_active {
            DeploymentState::ServiceInstalled
        } else {
            DeploymentState::Running
        }
    }
}

// ── Transitions ──────────────────────────────────────────────────────────────

/// One step along the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BuildImage,
    InstallService,
    StartService,
    RestartService,
    StopService,
}

impl Transition {
    /// Short label used in progress output and error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Transition::BuildImage => "build image",
            Transition::InstallService => "install service",
            Transition::StartService => "start service",
            Transition::RestartService => "restart service",
            Transition::StopService => "stop service",
        }
    }
}

/// Compute the transitions that take `observed` to `target`.
///
/// Configuration is settled before planning, so `observed.config_ready` is
/// expected to hold. `StatusOnly` never transitions.
#[must_use]
pub fn plan(target: TargetState, observed: &ObservedState) -> Vec<Transition> {
    match target {
        TargetState::EnsureRunning => walk_to_running(observed, false),
        TargetState::ForceRebuild => walk_to_running(observed, true),
        TargetState::Reconfigure => {
            if observed.unit != UnitStatus::Stale {
                return Vec::new();
            }
            let mut steps = vec![Transition::InstallService];
            if observed.service_active {
                steps.push(Transition::RestartService);
            }
            steps
        }
        TargetState::Stop => plan_stop(observed.unit.is_installed(), observed.service_active),
        TargetState::StatusOnly => Vec::new(),
    }
}

/// Stopping only acts on an installed, active service.
#[must_use]
pub fn plan_stop(installed: bool, active: bool) -> Vec<Transition> {
    if installed && active {
        vec![Transition::StopService]
    } else {
        Vec::new()
    }
}

fn walk_to_running(observed: &ObservedState, force_build: bool) -> Vec<Transition> {
    let mut steps = Vec::new();
    let mut current = observed.deployment_state();

    // A forced build rewinds the walk to just after the image step.
    if force_build && current >= DeploymentState::ImageBuilt {
        steps.push(Transition::BuildImage);
        current = DeploymentState::ImageBuilt;
    }

    while let Some(next) = current.next() {
        match next {
            DeploymentState::Absent | DeploymentState::Configured => {}
            DeploymentState::ImageBuilt => {
                if force_build || !observed.image_exists {
                    steps.push(Transition::BuildImage);
                }
            }
            DeploymentState::ServiceInstalled => {
                if observed.unit != UnitStatus::Current {
                    steps.push(Transition::InstallService);
                }
            }
            DeploymentState::Running => {
                if !observed.service_active {
                    steps.push(Transition::StartService);
                } else if !steps.is_empty() {
                    steps.push(Transition::RestartService);
                }
            }
        }
        current = next;
    }
    steps
}
