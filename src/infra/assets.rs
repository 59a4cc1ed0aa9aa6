//! Embedded assets compiled into the binary.
//!
//! - `assets/build/`   — container build context (`Containerfile`)
//! - `assets/jupyter/` — notebook-server configuration seeded into the
//!   mounted Jupyter config directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use include_dir::{Dir, DirEntry, include_dir};

static BUILD_CONTEXT: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/build");
static JUPYTER_CONFIG: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/jupyter");

/// Extract the build context to a temporary directory.
///
/// Returns `(path, guard)` where `guard` deletes the directory when dropped.
///
/// # Errors
///
/// Returns an error if the temporary directory cannot be created or a file
/// fails to extract.
pub fn extract_build_context() -> Result<(PathBuf, tempfile::TempDir)> {
    let dir = tempfile::Builder::new()
        .prefix("jupyter-deploy-build-")
        .tempdir()
        .context("creating temp dir for build context")?;
    BUILD_CONTEXT
        .extract(dir.path())
        .context("extracting build context")?;
    Ok((dir.path().to_path_buf(), dir))
}

/// Copy every embedded notebook config file that does not exist yet under
/// `dest`. Returns the paths written.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created.
pub fn seed_missing(dest: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    seed_dir(&JUPYTER_CONFIG, dest, &mut written)?;
    Ok(written)
}

fn seed_dir(dir: &Dir<'_>, dest: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => seed_dir(sub, dest, written)?,
            DirEntry::File(file) => {
                let target = dest.join(file.path());
                if target.exists() {
                    continue;
                }
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating directory {}", parent.display()))?;
                }
                std::fs::write(&target, file.contents())
                    .with_context(|| format!("writing {}", target.display()))?;
                written.push(target);
            }
        }
    }
    Ok(())
}
