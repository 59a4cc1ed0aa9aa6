//! Application service — configuration setup use-case.
//!
//! Load, and when needed prompt then persist. A straight sequence of
//! read-validate-store steps.

use anyhow::Result;

use crate::application::ports::{ConfigStore, ProgressReporter, Prompter};
use crate::domain::{ConfigError, DeployConfig, LoadedConfig};

/// How the configuration for this run was obtained.
#[derive(Debug)]
pub struct SettledConfig {
    pub config: DeployConfig,
    /// `true` when the prompts ran and a new configuration was saved.
    pub configured: bool,
}

/// Produce a complete configuration, prompting when the stored one is
/// missing or incomplete, or unconditionally when `reconfigure` is set.
///
/// # Errors
///
/// Returns [`ConfigError::SetupRequired`] if prompts are needed but
/// `interactive` is `false`, or any error from loading, prompting,
/// validating or saving.
pub fn settle_config(
    store: &impl ConfigStore,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    interactive: bool,
    reconfigure: bool,
) -> Result<SettledConfig> {
    let draft = match store.load()? {
        LoadedConfig::Ready { config, filled } => {
            if !filled.is_empty() {
                reporter.warn(&format!("filled in defaults for {}", filled.join(", ")));
            }
            if !reconfigure {
                return Ok(SettledConfig {
                    config,
                    configured: false,
                });
            }
            config
        }
        LoadedConfig::Incomplete { draft } => {
            reporter.warn("configuration is missing the AI API key");
            draft
        }
        LoadedConfig::Missing { draft } => draft,
    };

    if !interactive {
        return Err(ConfigError::SetupRequired.into());
    }

    let config = prompter.prompt(&draft)?;
    config.validate()?;
    store.save(&config)?;
    reporter.success(&format!(
        "configuration saved to {}",
        store.path().display()
    ));
    tracing::info!(path = %store.path().display(), "configuration saved");

    Ok(SettledConfig {
        config,
        configured: true,
    })
}

/// Load the configuration without ever prompting.
///
/// Returns the configuration to observe with and whether it is complete.
///
/// # Errors
///
/// Returns an error if the stored file exists but cannot be loaded.
pub fn peek_config(store: &impl ConfigStore) -> Result<(DeployConfig, bool)> {
    Ok(match store.load()? {
        LoadedConfig::Ready { config, .. } => (config, true),
        LoadedConfig::Incomplete { draft } | LoadedConfig::Missing { draft } => (draft, false),
    })
}
