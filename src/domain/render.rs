//! Rendering of the systemd unit and the container runtime arguments.
//!
//! Both renderers are pure functions of [`DeployConfig`]: identical input
//! yields byte-identical output, which is what lets the orchestrator detect
//! an up-to-date unit by plain comparison.

use crate::domain::config::DeployConfig;
use crate::domain::deployment::CONTAINER_NAME;

/// Port Jupyter listens on inside the container.
pub const CONTAINER_PORT: u16 = 8888;

const PODMAN: &str = "/usr/bin/podman";

/// Arguments passed to `podman` (without the program itself) to run the
/// notebook container.
#[must_use]
pub fn render_container_args(config: &DeployConfig) -> Vec<String> {
    container_arg_groups(config).into_iter().flatten().collect()
}

/// Render the complete `jupyter-lab.service` user unit.
#[must_use]
pub fn render_unit(config: &DeployConfig) -> String {
    let env = [
        ("JUPYTER_NOTEBOOKS_DIR", config.paths.notebooks_dir.as_str()),
        ("JUPYTER_AI_MODEL", config.ai.model.as_str()),
        ("OPENAI_API_KEY", config.ai.api_key.as_str()),
        ("OPENAI_BASE_URL", config.ai.base_url.as_str()),
        ("ANTHROPIC_API_KEY", config.ai.api_key.as_str()),
        ("ANTHROPIC_BASE_URL", config.ai.base_url.as_str()),
    ];

    let mut out = String::new();
    out.push_str("# Managed by jupyter-deploy. Local edits are replaced on the next deploy.\n");
    out.push_str("[Unit]\n");
    out.push_str("Description=Jupyter Lab Container\n");
    out.push_str("After=network-online.target\n");
    out.push_str("Wants=network-online.target\n");
    out.push('\n');
    out.push_str("[Service]\n");
    out.push_str("Type=simple\n");
    out.push_str("Restart=always\n");
    out.push_str("RestartSec=5\n");
    for (key, value) in env {
        out.push_str(&format!("Environment=\"{key}={}\"\n", escape_env_value(value)));
    }
    out.push('\n');
    out.push_str(&format!("ExecStartPre=-{PODMAN} rm -f --ignore {CONTAINER_NAME}\n"));

    let lines: Vec<String> = container_arg_groups(config)
        .into_iter()
        .map(|group| group.join(" "))
        .collect();
    out.push_str(&format!("ExecStart={PODMAN} {}\n", lines.join(" \\\n  ")));
    out.push('\n');
    out.push_str(&format!("ExecStop={PODMAN} stop -t 10 {CONTAINER_NAME}\n"));
    out.push('\n');
    out.push_str("[Install]\n");
    out.push_str("WantedBy=default.target\n");
    out
}

/// Container arguments grouped one option per line for the unit file.
///
/// Values that come from the user reach the container through environment
/// variables set by the unit, never by splicing them into the command line.
/// The image name is the exception and is validated to be safe verbatim.
fn container_arg_groups(config: &DeployConfig) -> Vec<Vec<String>> {
    let group = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();
    let publish = format!("127.0.0.1:{}:{CONTAINER_PORT}", config.container.port);

    vec![
        group(&["run", "--rm", "--name", CONTAINER_NAME]),
        group(&["-p", publish.as_str()]),
        group(&["-e", "JUPYTER_AI_MODEL"]),
        group(&["-e", "OPENAI_API_KEY"]),
        group(&["-e", "OPENAI_BASE_URL"]),
        group(&["-e", "ANTHROPIC_API_KEY"]),
        group(&["-e", "ANTHROPIC_BASE_URL"]),
        group(&["-v", "${JUPYTER_NOTEBOOKS_DIR}:/workspace/notebooks:Z"]),
        group(&["-v", "%h/.local/share/jupyter-lab/.uv-cache:/workspace/.uv-cache:Z"]),
        group(&["-v", "%h/.config/jupyter-lab:/workspace/.jupyter:Z"]),
        group(&[config.container.image_name.as_str()]),
    ]
}

/// Escape a value for use inside a double-quoted `Environment=` assignment.
fn escape_env_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '%' => out.push_str("%%"),
            _ => out.push(c),
        }
    }
    out
}
