//! Moving an archived file back to its canonical location.
//!
//! Each step is attempted and then judged by the observable end state, never
//! by the attempt's own return value. Two requests racing for the same file
//! therefore both succeed: the loser's rename fails, but its verify step sees
//! the winner's result.

use crate::upload_path::RestoreTarget;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromoteError {
    #[error("archive copy is not a readable file: {}", .0.display())]
    SourceUnreadable(PathBuf),
    #[error("destination directory could not be created: {}", .0.display())]
    DirectoryUnavailable(PathBuf),
    #[error("file not readable at destination after move: {}", .0.display())]
    NotVerified(PathBuf),
}

/// Promotes `target.archive_path` to `target.canonical_path`.
pub fn promote(target: &RestoreTarget) -> Result<(), PromoteError> {
    if !is_readable_file(&target.archive_path) {
        return Err(PromoteError::SourceUnreadable(target.archive_path.clone()));
    }
    if !ensure_dir(&target.canonical_dir) {
        return Err(PromoteError::DirectoryUnavailable(
            target.canonical_dir.clone(),
        ));
    }
    move_file(&target.archive_path, &target.canonical_path);
    if !is_readable_file(&target.canonical_path) {
        return Err(PromoteError::NotVerified(target.canonical_path.clone()));
    }
    tracing::info!(
        from = %target.archive_path.display(),
        to = %target.canonical_path.display(),
        "promoted archived upload"
    );
    Ok(())
}

/// A regular file we can open for reading.
pub fn is_readable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => File::open(path).is_ok(),
        _ => false,
    }
}

/// Makes sure `dir` exists. Creation errors are ignored; the final `is_dir` decides.
pub fn ensure_dir(dir: &Path) -> bool {
    if dir.is_dir() {
        return true;
    }
    if let Err(e) = create_dir_all_permissive(dir) {
        tracing::debug!(dir = %dir.display(), error = %e, "create_dir_all failed");
    }
    dir.is_dir()
}

#[cfg(unix)]
fn create_dir_all_permissive(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)
}

#[cfg(not(unix))]
fn create_dir_all_permissive(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Best-effort move. The caller verifies the destination afterwards.
pub fn move_file(from: &Path, to: &Path) {
    if let Err(err) = fs::rename(from, to) {
        recover_failed_rename(from, to, &err);
    }
}

/// Handles a failed rename: a cross-device error falls back to copying,
/// anything else is only logged.
fn recover_failed_rename(from: &Path, to: &Path, err: &io::Error) {
    if is_cross_device(err) {
        if let Err(e) = copy_then_remove(from, to) {
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                error = %e,
                "cross-device copy failed"
            );
        }
        return;
    }
    tracing::debug!(
        from = %from.display(),
        to = %to.display(),
        error = %err,
        "rename failed; relying on destination check"
    );
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_err: &io::Error) -> bool {
    false
}

/// Copies into a temp file beside `to`, persists it without clobbering, then
/// removes `from`. The canonical path never holds a partial file.
pub fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let dir = to
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let mut src = File::open(from)?;
    let perms = src.metadata()?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut src, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), perms)?;
    tmp.persist_noclobber(to).map_err(|e| e.error)?;

    fs::remove_file(from)
}
