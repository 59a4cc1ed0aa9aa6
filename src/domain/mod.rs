//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod deployment;
pub mod error;
pub mod render;

pub use config::{Completion, DeployConfig, LoadedConfig, PartialConfig};
pub use deployment::{
    DeploymentState, ObservedState, TargetFlags, TargetState, Transition, UnitStatus, plan,
    plan_stop,
};
pub use error::{ConfigError, TransitionError, UsageError};
pub use render::{render_container_args, render_unit};
