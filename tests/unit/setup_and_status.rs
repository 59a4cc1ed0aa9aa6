//! Configuration settling and the read-only status query.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use jupyter_deploy::application::ports::{ConfigStore, UnitStore};
use jupyter_deploy::application::services::setup::settle_config;
use jupyter_deploy::application::services::status::gather_status;
use jupyter_deploy::domain::{ConfigError, DeploymentState, UnitStatus, render_unit};

use crate::helpers::{
    Fixture, FakeHost, IMAGE_EXISTS, IS_ACTIVE, RecordingReporter, ScriptedPrompter,
};

// ── settle_config ─────────────────────────────────────────────────────────────

#[test]
fn ready_config_is_used_without_prompting() {
    let fx = Fixture::new(FakeHost::new());
    fx.store.save(&fx.config()).unwrap();

    let settled = settle_config(
        &fx.store,
        &ScriptedPrompter::never(),
        &RecordingReporter::default(),
        true,
        false,
    )
    .expect("settle");

    assert!(!settled.configured);
    assert_eq!(settled.config, fx.config());
}

#[test]
fn incomplete_config_prompts_with_file_values_prefilled() {
    let fx = Fixture::new(FakeHost::new());
    std::fs::create_dir_all(&fx.layout.config_dir).unwrap();
    std::fs::write(
        &fx.layout.config_file,
        "[ai]\nmodel = \"glm-4\"\n[container]\nport = 9100\n",
    )
    .unwrap();
    let prompter = ScriptedPrompter::answering(fx.config());
    let reporter = RecordingReporter::default();

    let settled =
        settle_config(&fx.store, &prompter, &reporter, true, false).expect("settle");

    let draft = &prompter.drafts.borrow()[0];
    assert_eq!(draft.ai.model, "glm-4");
    assert_eq!(draft.container.port, 9100);
    assert!(draft.ai.api_key.is_empty());
    assert!(settled.configured);
    assert!(reporter.contains("missing the AI API key"));
    assert!(reporter.contains("configuration saved"));
}

#[test]
fn defaults_filled_at_load_are_reported() {
    let fx = Fixture::new(FakeHost::new());
    std::fs::create_dir_all(&fx.layout.config_dir).unwrap();
    std::fs::write(&fx.layout.config_file, "[ai]\napi_key = \"sk-1\"\n").unwrap();
    let reporter = RecordingReporter::default();

    let settled = settle_config(
        &fx.store,
        &ScriptedPrompter::never(),
        &reporter,
        false,
        false,
    )
    .expect("settle");

    assert_eq!(settled.config.container.port, 8888);
    assert!(reporter.contains("container.port"));
    let text = std::fs::read_to_string(&fx.layout.config_file).unwrap();
    assert!(text.contains("[paths]"), "merged record is re-persisted: {text}");
}

#[test]
fn prompted_values_are_validated_before_saving() {
    let fx = Fixture::new(FakeHost::new());
    let mut bad = fx.config();
    bad.ai.base_url = "not a url".to_string();

    let err = settle_config(
        &fx.store,
        &ScriptedPrompter::answering(bad),
        &RecordingReporter::default(),
        true,
        false,
    )
    .expect_err("invalid base url");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidValue { field: "ai.base_url", .. })
    ));
    assert!(!fx.layout.config_file.exists());
}

#[test]
fn reconfigure_without_prompts_is_setup_required() {
    let fx = Fixture::new(FakeHost::new());
    fx.store.save(&fx.config()).unwrap();

    let err = settle_config(
        &fx.store,
        &ScriptedPrompter::never(),
        &RecordingReporter::default(),
        false,
        true,
    )
    .expect_err("prompts disabled");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::SetupRequired)
    ));
}

#[test]
fn unparseable_config_is_fatal_and_names_the_file() {
    let fx = Fixture::new(FakeHost::new());
    std::fs::create_dir_all(&fx.layout.config_dir).unwrap();
    std::fs::write(&fx.layout.config_file, "[ai\n").unwrap();

    let err = settle_config(
        &fx.store,
        &ScriptedPrompter::never(),
        &RecordingReporter::default(),
        true,
        false,
    )
    .expect_err("parse error");

    assert!(err.to_string().contains("config.toml"), "got: {err}");
}

// ── gather_status ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_of_fresh_system_is_absent_and_never_prompts() {
    let fx = Fixture::new(FakeHost::new());

    let report = gather_status(&fx.store, &fx.runtime, &fx.services, &fx.units)
        .await
        .expect("status");

    assert_eq!(report.state, DeploymentState::Absent);
    assert_eq!(report.observed.unit, UnitStatus::Missing);
    assert_eq!(fx.host.calls(), vec![IMAGE_EXISTS, IS_ACTIVE]);
    assert!(!fx.layout.config_file.exists(), "status must not write config");
}

#[tokio::test]
async fn status_of_running_deployment_reports_url() {
    let fx = Fixture::new(FakeHost::new().with_image().with_active_service());
    let mut config = fx.config();
    config.container.port = 9001;
    fx.store.save(&config).unwrap();
    fx.units.install(&render_unit(&config)).unwrap();

    let report = gather_status(&fx.store, &fx.runtime, &fx.services, &fx.units)
        .await
        .expect("status");

    assert_eq!(report.state, DeploymentState::Running);
    assert_eq!(report.url(), "http://localhost:9001");
}

#[tokio::test]
async fn status_flags_stale_unit() {
    let fx = Fixture::new(FakeHost::new().with_image().with_active_service());
    fx.store.save(&fx.config()).unwrap();
    fx.units.install("[Unit]\n").unwrap();

    let report = gather_status(&fx.store, &fx.runtime, &fx.services, &fx.units)
        .await
        .expect("status");

    assert_eq!(report.observed.unit, UnitStatus::Stale);
    assert_eq!(report.state, DeploymentState::ImageBuilt);
    assert!(report.observed.service_active);
}

#[tokio::test]
async fn status_with_incomplete_config_does_not_call_unit_out_of_date() {
    let fx = Fixture::new(FakeHost::new().with_image().with_active_service());
    std::fs::create_dir_all(&fx.layout.config_dir).unwrap();
    std::fs::write(&fx.layout.config_file, "[container]\nport = 9100\n").unwrap();
    fx.units.install("[Unit]\nDescription=previous deploy\n").unwrap();

    let report = gather_status(&fx.store, &fx.runtime, &fx.services, &fx.units)
        .await
        .expect("status");

    assert!(!report.observed.config_ready);
    assert_eq!(report.unit_summary(), "installed");
}

#[tokio::test]
async fn status_with_ready_config_calls_stale_unit_out_of_date() {
    let fx = Fixture::new(FakeHost::new().with_image());
    fx.store.save(&fx.config()).unwrap();
    fx.units.install("[Unit]\n").unwrap();

    let report = gather_status(&fx.store, &fx.runtime, &fx.services, &fx.units)
        .await
        .expect("status");

    assert_eq!(report.unit_summary(), "installed (out of date)");
}
