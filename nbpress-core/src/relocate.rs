//! Moves the converter's `<stem>_files` folder under the site's asset root.

use serde::Serialize;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::error::PublishError;
use crate::progress::Progress;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Relocation {
    /// No generated asset folder: the notebook produced no images.
    Skipped { from: PathBuf },
    Moved {
        from: PathBuf,
        to: PathBuf,
        /// A folder from an earlier run was deleted first.
        replaced_existing: bool,
    },
    DryRun { from: PathBuf, to: PathBuf },
}

impl Relocation {
    /// Whether references in the converted document need rewriting afterwards.
    pub fn has_assets(&self) -> bool {
        !matches!(self, Relocation::Skipped { .. })
    }
}

/// Move `from` to `to`, replacing whatever is at `to`.
///
/// A missing `from` is the normal outcome for notebooks without image output and
/// leaves the filesystem untouched.
pub fn relocate_assets<P>(
    from: &Path,
    to: &Path,
    dry_run: bool,
    progress: &P,
) -> Result<Relocation, PublishError>
where
    P: Progress + ?Sized,
{
    if !from.exists() {
        progress.step(&format!("Image folder \"{}\" does not exist", from.display()));
        progress.step(
            "This is expected if your notebook does not contain graphs that would generate image files.",
        );
        info!(path = %from.display(), "No generated asset folder, skipping relocation");
        return Ok(Relocation::Skipped {
            from: from.to_path_buf(),
        });
    }

    progress.step(&format!("Moving folder: {}", from.display()));
    progress.step(&format!("To: {}", to.display()));

    if dry_run {
        info!(from = %from.display(), to = %to.display(), "Dry run: skipping asset relocation");
        return Ok(Relocation::DryRun {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    let replaced_existing = to.exists();
    if replaced_existing {
        fs::remove_dir_all(to).map_err(|e| {
            error!(error = ?e, path = %to.display(), "Failed to remove previous asset folder");
            PublishError::io(to, e)
        })?;
        debug!(path = %to.display(), "Removed previous asset folder");
    }

    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            error!(error = ?e, path = %parent.display(), "Failed to create asset root");
            PublishError::io(parent, e)
        })?;
    }

    move_dir(from, to)?;
    info!(
        from = %from.display(),
        to = %to.display(),
        replaced_existing,
        "Relocated generated asset folder"
    );
    Ok(Relocation::Moved {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        replaced_existing,
    })
}

fn move_dir(from: &Path, to: &Path) -> Result<(), PublishError> {
    move_dir_with(from, to, |from, to| fs::rename(from, to))
}

/// Move with `rename`, falling back to copy-then-delete when the two paths are on
/// different filesystems.
fn move_dir_with<R>(from: &Path, to: &Path, rename: R) -> Result<(), PublishError>
where
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    match rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), to = %to.display(), "Rename crosses devices, copying instead");
            copy_dir_all(from, to)?;
            fs::remove_dir_all(from).map_err(|e| PublishError::io(from, e))
        }
        Err(e) => {
            error!(error = ?e, from = %from.display(), to = %to.display(), "Failed to move asset folder");
            Err(PublishError::io(from, e))
        }
    }
}

/// Recursive copy that recreates symlinks instead of following them.
fn copy_dir_all(from: &Path, to: &Path) -> Result<(), PublishError> {
    fs::create_dir_all(to).map_err(|e| PublishError::io(to, e))?;
    for entry in fs::read_dir(from).map_err(|e| PublishError::io(from, e))? {
        let entry = entry.map_err(|e| PublishError::io(from, e))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| PublishError::io(&src, e))?;
        if file_type.is_symlink() {
            copy_symlink(&src, &dst).map_err(|e| PublishError::io(&src, e))?;
        } else if file_type.is_dir() {
            copy_dir_all(&src, &dst)?;
        } else {
            fs::copy(&src, &dst).map_err(|e| PublishError::io(&src, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(windows)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}
