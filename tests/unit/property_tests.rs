//! Property-based tests for the planner and the renderers.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use jupyter_deploy::domain::{
    DeployConfig, DeploymentState, ObservedState, PartialConfig, TargetState, Transition,
    UnitStatus, plan, render_container_args, render_unit,
};
use proptest::prelude::*;

fn arb_unit() -> impl Strategy<Value = UnitStatus> {
    prop_oneof![
        Just(UnitStatus::Missing),
        Just(UnitStatus::Stale),
        Just(UnitStatus::Current),
    ]
}

fn arb_observed() -> impl Strategy<Value = ObservedState> {
    (any::<bool>(), arb_unit(), any::<bool>()).prop_map(|(image_exists, unit, service_active)| {
        ObservedState {
            config_ready: true,
            image_exists,
            unit,
            service_active,
        }
    })
}

fn arb_config() -> impl Strategy<Value = DeployConfig> {
    (
        "[A-Za-z0-9_-]{1,40}",
        prop_oneof![Just("https"), Just("http")],
        "[a-z0-9.-]{1,20}(/v[0-9])?",
        "[a-z0-9.-]{1,20}",
        "/[A-Za-z0-9 _%\"/.-]{1,40}",
        "[a-z0-9./-]{1,30}(:[a-z0-9.]{1,8})?",
        1u16..=65535,
    )
        .prop_map(|(key, scheme, host, model, notebooks, image, port)| {
            let mut config = DeployConfig::defaults(std::path::Path::new("/home/test"));
            config.ai.api_key = key;
            config.ai.base_url = format!("{scheme}://{host}");
            config.ai.model = model;
            config.paths.notebooks_dir = notebooks;
            config.container.image_name = image;
            config.container.port = port;
            config
        })
}

/// Apply the effect each transition has on the outside world.
fn apply(mut observed: ObservedState, steps: &[Transition]) -> ObservedState {
    for step in steps {
        match step {
            Transition::BuildImage => observed.image_exists = true,
            Transition::InstallService => observed.unit = UnitStatus::Current,
            Transition::StartService | Transition::RestartService => {
                observed.service_active = true;
            }
            Transition::StopService => observed.service_active = false,
        }
    }
    observed
}

proptest! {
    /// Executing the plan reaches Running, and planning again yields nothing.
    #[test]
    fn prop_ensure_running_converges_in_one_run(observed in arb_observed()) {
        let steps = plan(TargetState::EnsureRunning, &observed);
        let after = apply(observed, &steps);
        prop_assert_eq!(after.deployment_state(), DeploymentState::Running);
        prop_assert!(plan(TargetState::EnsureRunning, &after).is_empty());
    }

    /// A forced rebuild always builds first and always leaves the service running.
    #[test]
    fn prop_force_rebuild_builds_first(observed in arb_observed()) {
        let steps = plan(TargetState::ForceRebuild, &observed);
        prop_assert_eq!(steps.first(), Some(&Transition::BuildImage));
        prop_assert_eq!(steps.iter().filter(|s| **s == Transition::BuildImage).count(), 1);
        prop_assert_eq!(apply(observed, &steps).deployment_state(), DeploymentState::Running);
    }

    /// Reconfigure never builds or starts.
    #[test]
    fn prop_reconfigure_never_builds_or_starts(observed in arb_observed()) {
        let steps = plan(TargetState::Reconfigure, &observed);
        prop_assert!(!steps.contains(&Transition::BuildImage));
        prop_assert!(!steps.contains(&Transition::StartService));
        prop_assert_eq!(
            apply(observed, &steps).service_active,
            observed.service_active
        );
    }

    /// Both renderers are pure: identical input, byte-identical output.
    #[test]
    fn prop_renderers_are_deterministic(config in arb_config()) {
        prop_assert_eq!(render_unit(&config), render_unit(&config.clone()));
        prop_assert_eq!(render_container_args(&config), render_container_args(&config.clone()));
    }

    /// The port mapping always binds to loopback only.
    #[test]
    fn prop_port_is_published_on_loopback(config in arb_config()) {
        let args = render_container_args(&config);
        let mapping = format!("127.0.0.1:{}:8888", config.container.port);
        let idx = args.iter().position(|a| a == "-p").expect("-p present");
        prop_assert_eq!(&args[idx + 1], &mapping);
        prop_assert_eq!(args.last(), Some(&config.container.image_name));
    }

    /// Saving and loading a full configuration gives back the same value.
    #[test]
    fn prop_config_toml_round_trip(config in arb_config()) {
        let text = toml::to_string(&config).expect("serialize");
        let partial: PartialConfig = toml::from_str(&text).expect("parse");
        let completed = partial.complete(std::path::Path::new("/home/test")).expect("complete");
        match completed {
            jupyter_deploy::domain::Completion::Complete { config: back, filled } => {
                prop_assert!(filled.is_empty());
                prop_assert_eq!(back, config);
            }
            jupyter_deploy::domain::Completion::NeedsApiKey { .. } => {
                prop_assert!(false, "api key was lost");
            }
        }
    }
}
