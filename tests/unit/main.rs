//! Unit tests for jupyter-deploy
//!
//! These tests drive the application services against a simulated host that
//! records every external command. No real podman or systemd is touched.

mod architecture;
mod property_tests;
mod setup_and_status;
