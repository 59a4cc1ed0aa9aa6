//! Domain types, defaults and validators for the deployer configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://api.z.ai/v1";
pub const DEFAULT_MODEL: &str = "glm-4-flash";
pub const DEFAULT_IMAGE_NAME: &str = "localhost/jupyter-lab:latest";
pub const DEFAULT_PORT: u16 = 8888;

/// Models offered by the interactive setup. Anything else is entered as a
/// custom model name.
pub const SUGGESTED_MODELS: &[&str] = &["glm-4-flash", "glm-4", "glm-4-plus"];

/// Default notebooks directory, relative to the user's home.
#[must_use]
pub fn default_notebooks_dir(home: &Path) -> String {
    home.join("Documents").join("jupyter").display().to_string()
}

// ── Config schema ────────────────────────────────────────────────────────────

/// Fully populated configuration, stored in `~/.config/jupyter-lab/config.toml`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub ai: AiConfig,
    pub paths: PathsConfig,
    pub container: ContainerConfig,
}

/// AI endpoint used by the completion extension.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub notebooks_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    pub image_name: String,
    pub port: u16,
}

impl DeployConfig {
    /// Configuration with every default applied and an empty API key.
    #[must_use]
    pub fn defaults(home: &Path) -> Self {
        Self {
            ai: AiConfig {
                api_key: String::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
            paths: PathsConfig {
                notebooks_dir: default_notebooks_dir(home),
            },
            container: ContainerConfig {
                image_name: DEFAULT_IMAGE_NAME.to_string(),
                port: DEFAULT_PORT,
            },
        }
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_key(&self.ai.api_key)?;
        validate_base_url(&self.ai.base_url)?;
        validate_model(&self.ai.model)?;
        validate_notebooks_dir(&self.paths.notebooks_dir)?;
        validate_image_name(&self.container.image_name)?;
        validate_port(self.container.port)?;
        Ok(())
    }
}

impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("ai", &self.ai)
            .field("paths", &self.paths)
            .field("container", &self.container)
            .finish()
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

// ── Persisted (partial) form ─────────────────────────────────────────────────

/// On-disk shape: every field optional so old or hand-edited files load.
///
/// `port` stays a signed integer here so out-of-range values surface as a
/// validation error naming the field rather than a bare TOML type error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub ai: PartialAi,
    pub paths: PartialPaths,
    pub container: PartialContainer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialAi {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialPaths {
    pub notebooks_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialContainer {
    pub image_name: Option<String>,
    pub port: Option<i64>,
}

/// Result of merging a persisted file with the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// All fields present after merging. `filled` names the fields that
    /// came from defaults; the caller re-persists when it is non-empty.
    Complete {
        config: DeployConfig,
        filled: Vec<&'static str>,
    },
    /// The API key is missing. `draft` carries every other value so the
    /// interactive setup can pre-fill its prompts.
    NeedsApiKey { draft: DeployConfig },
}

/// What the configuration store found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedConfig {
    /// No file at all: interactive setup is needed. `draft` holds the
    /// defaults to offer in the prompts.
    Missing { draft: DeployConfig },
    /// File present but without an API key.
    Incomplete { draft: DeployConfig },
    /// Fully populated. `filled` lists the fields taken from defaults; the
    /// store has already re-persisted the merged record when non-empty.
    Ready {
        config: DeployConfig,
        filled: Vec<&'static str>,
    },
}

impl PartialConfig {
    /// Fill absent fields from the defaults and validate the result.
    ///
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value is invalid.
    pub fn complete(self, home: &Path) -> Result<Completion, ConfigError> {
        let defaults = DeployConfig::defaults(home);
        let mut filled = Vec::new();

        let mut take = |value: Option<String>, field: &'static str, default: String| {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    filled.push(field);
                    default
                }
            }
        };

        let base_url = take(self.ai.base_url, "ai.base_url", defaults.ai.base_url);
        let model = take(self.ai.model, "ai.model", defaults.ai.model);
        let notebooks_dir = take(
            self.paths.notebooks_dir,
            "paths.notebooks_dir",
            defaults.paths.notebooks_dir,
        );
        let image_name = take(
            self.container.image_name,
            "container.image_name",
            defaults.container.image_name,
        );

        let port = match self.container.port {
            Some(raw) => u16::try_from(raw)
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "container.port",
                    value: raw.to_string(),
                    reason: "must be between 1 and 65535".to_string(),
                })?,
            None => {
                filled.push("container.port");
                defaults.container.port
            }
        };

        let api_key = self
            .ai
            .api_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_default();

        let config = DeployConfig {
            ai: AiConfig {
                api_key,
                base_url,
                model,
            },
            paths: PathsConfig { notebooks_dir },
            container: ContainerConfig { image_name, port },
        };

        if config.ai.api_key.is_empty() {
            return Ok(Completion::NeedsApiKey { draft: config });
        }
        config.validate()?;
        Ok(Completion::Complete { config, filled })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// # Errors
///
/// Returns an error if the key is empty or contains whitespace.
pub fn validate_api_key(key: &str) -> Result<(), ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::MissingField { field: "ai.api_key" });
    }
    if key.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "ai.api_key",
            value: "<redacted>".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }
    Ok(())
}

/// # Errors
///
/// Returns an error unless the URL is `http://` or `https://` with a host.
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            field: "ai.base_url",
            value: url.to_string(),
            reason: "must be an http:// or https:// URL".to_string(),
        }),
    }
}

/// # Errors
///
/// Returns an error if the model name is empty or contains whitespace.
pub fn validate_model(model: &str) -> Result<(), ConfigError> {
    if model.is_empty() || model.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "ai.model",
            value: model.to_string(),
            reason: "must be a non-empty identifier without whitespace".to_string(),
        });
    }
    Ok(())
}

/// The directory becomes a `-v <dir>:<target>:Z` bind mount, so a colon
/// would split the volume spec.
///
/// # Errors
///
/// Returns an error unless the path is absolute and free of `:` and control
/// characters.
pub fn validate_notebooks_dir(dir: &str) -> Result<(), ConfigError> {
    let reason = if !Path::new(dir).is_absolute() {
        "must be an absolute path"
    } else if dir.contains(':') || dir.chars().any(char::is_control) {
        "must not contain ':' or control characters"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidValue {
        field: "paths.notebooks_dir",
        value: dir.to_string(),
        reason: reason.to_string(),
    })
}

/// The image name is spliced into the unit's `ExecStart=` line verbatim, so
/// it may not contain whitespace, quotes or systemd specifiers.
///
/// # Errors
///
/// Returns an error if the name is empty or contains a forbidden character.
pub fn validate_image_name(name: &str) -> Result<(), ConfigError> {
    let forbidden = |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '%' | '\\' | '$');
    if name.is_empty() || name.chars().any(forbidden) {
        return Err(ConfigError::InvalidValue {
            field: "container.image_name",
            value: name.to_string(),
            reason: "must be a non-empty image reference".to_string(),
        });
    }
    Ok(())
}

/// # Errors
///
/// Returns an error for port 0.
pub fn validate_port(port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidValue {
            field: "container.port",
            value: "0".to_string(),
            reason: "must be between 1 and 65535".to_string(),
        });
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
