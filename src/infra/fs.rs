//! Filesystem infrastructure — atomic writes, the installed unit file and
//! host preparation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{HostSetup, UnitStore};
use crate::domain::DeployConfig;
use crate::infra::assets;
use crate::infra::paths::HostLayout;

/// Write `content` to `path` via a temp file and rename, so a crash never
/// leaves a half-written file behind. The file is created with mode 0600.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or any step of
/// the write fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);
    std::fs::write(&temp_path, content)
        .with_context(|| format!("writing temp file {}", temp_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
    }

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}

/// Read a file's raw bytes, mapping "not found" to `None`. Decoding is left
/// to the caller.
///
/// # Errors
///
/// Returns an error for any failure other than the file being absent.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

// ── Unit file ────────────────────────────────────────────────────────────────

/// The systemd user unit on disk. It embeds the API key, hence mode 0600.
pub struct SystemdUnitFile {
    path: PathBuf,
}

impl SystemdUnitFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl UnitStore for SystemdUnitFile {
    // Undecodable bytes never equal a rendered unit, so they read as stale.
    fn read_installed(&self) -> Result<Option<String>> {
        Ok(read_optional(&self.path)?.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn install(&self, content: &str) -> Result<()> {
        write_atomic(&self.path, content)
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

// ── Host directories ─────────────────────────────────────────────────────────

/// Host directories and seeded notebook-server configuration.
pub struct HostDirs {
    layout: HostLayout,
}

impl HostDirs {
    #[must_use]
    pub fn new(layout: HostLayout) -> Self {
        Self { layout }
    }
}

impl HostSetup for HostDirs {
    fn prepare(&self, config: &DeployConfig) -> Result<()> {
        let notebooks = PathBuf::from(&config.paths.notebooks_dir);
        for dir in [&self.layout.config_dir, &self.layout.cache_dir, &notebooks] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
            tracing::debug!(dir = %dir.display(), "directory ready");
        }

        // User edits to the seeded files are kept.
        let seeded = assets::seed_missing(&self.layout.config_dir)?;
        for path in seeded {
            tracing::info!(path = %path.display(), "seeded notebook config");
        }
        Ok(())
    }

    fn build_context(&self) -> Result<(PathBuf, Box<dyn std::any::Any>)> {
        let (path, guard) = assets::extract_build_context()?;
        Ok((path, Box::new(guard)))
    }
}
