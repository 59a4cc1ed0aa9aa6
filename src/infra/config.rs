//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{Completion, DeployConfig, LoadedConfig, PartialConfig};
use crate::domain::error::ConfigError;
use crate::infra::fs::{read_optional, write_atomic};

/// Production `ConfigStore` backed by a TOML file on disk.
pub struct TomlConfigStore {
    path: PathBuf,
    home: PathBuf,
}

impl TomlConfigStore {
    /// `home` supplies the default notebooks directory.
    #[must_use]
    pub fn new(path: PathBuf, home: PathBuf) -> Self {
        Self { path, home }
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<LoadedConfig> {
        let Some(bytes) = read_optional(&self.path)? else {
            return Ok(LoadedConfig::Missing {
                draft: DeployConfig::defaults(&self.home),
            });
        };

        let content = String::from_utf8(bytes).map_err(|e| ConfigError::Unparseable {
            path: self.path.clone(),
            message: format!("not valid UTF-8 ({e})"),
        })?;

        let partial: PartialConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Unparseable {
                path: self.path.clone(),
                message: e.message().to_string(),
            })?;

        let completion = partial
            .complete(&self.home)
            .map_err(|e| ConfigError::Invalid {
                path: self.path.clone(),
                reason: Box::new(e),
            })?;

        Ok(match completion {
            Completion::NeedsApiKey { draft } => LoadedConfig::Incomplete { draft },
            Completion::Complete { config, filled } => {
                if !filled.is_empty() {
                    tracing::info!(?filled, path = %self.path.display(), "re-persisting defaults");
                    self.save(&config)?;
                }
                LoadedConfig::Ready { config, filled }
            }
        })
    }

    fn save(&self, config: &DeployConfig) -> Result<()> {
        let content = toml::to_string(config).context("cannot serialize config")?;
        write_atomic(&self.path, &content)
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }
}
