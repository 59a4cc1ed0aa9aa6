//! Fixed host locations, all derived from the user's home directory.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::deployment::UNIT_NAME;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "JUPYTER_DEPLOY_CONFIG";

/// Every path the deployer reads or writes.
#[derive(Debug, Clone)]
pub struct HostLayout {
    pub home: PathBuf,
    /// `~/.config/jupyter-lab`, mounted into the container as the Jupyter
    /// config directory.
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    /// `~/.local/share/jupyter-lab/.uv-cache`.
    pub cache_dir: PathBuf,
    pub unit_file: PathBuf,
}

impl HostLayout {
    /// Layout for the current user, honouring `JUPYTER_DEPLOY_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        let mut layout = Self::with_home(&home);
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            if !val.is_empty() {
                layout.config_file = PathBuf::from(val);
            }
        }
        Ok(layout)
    }

    /// Layout rooted at an explicit home directory (used in tests).
    #[must_use]
    pub fn with_home(home: &Path) -> Self {
        let config_dir = home.join(".config").join("jupyter-lab");
        Self {
            home: home.to_path_buf(),
            config_file: config_dir.join("config.toml"),
            cache_dir: home
                .join(".local")
                .join("share")
                .join("jupyter-lab")
                .join(".uv-cache"),
            unit_file: home
                .join(".config")
                .join("systemd")
                .join("user")
                .join(UNIT_NAME),
            config_dir,
        }
    }
}
