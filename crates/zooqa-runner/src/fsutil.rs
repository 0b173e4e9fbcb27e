//! Filesystem helpers for the runner.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Remove `path` recursively; an absent path is not an error.
pub(crate) fn remove_dir_idempotent(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("failed to remove directory {}", path.display()))
        }
    }
}

/// Replace `dst` with `src`: delete any existing directory at `dst`, then
/// rename `src` into place.
///
/// Not atomic — a crash between the delete and the rename leaves neither
/// directory present. Acceptable for an offline test tool; callers needing
/// stronger guarantees must serialize runs externally.
pub(crate) fn replace_dir(src: &Path, dst: &Path) -> Result<()> {
    if dst.is_dir() {
        fs::remove_dir_all(dst)
            .with_context(|| format!("failed to remove stale directory {}", dst.display()))?;
    }
    fs::rename(src, dst)
        .with_context(|| format!("failed to rename {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Removes a directory when dropped, unless [`finish`](Self::finish) ran
/// first. Covers error exit paths where `?` has already taken over control
/// flow.
pub(crate) struct RemoveOnDrop {
    path: PathBuf,
    armed: bool,
}

impl RemoveOnDrop {
    pub(crate) fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf(), armed: true }
    }

    /// Remove the directory now, propagating any error, and disarm the
    /// drop handler.
    pub(crate) fn finish(mut self) -> Result<()> {
        self.armed = false;
        remove_dir_idempotent(&self.path)
    }
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        if self.armed {
            if let Err(error) = remove_dir_idempotent(&self.path) {
                warn!(path = %self.path.display(), %error, "cleanup of test-data directory failed");
            }
        }
    }
}
