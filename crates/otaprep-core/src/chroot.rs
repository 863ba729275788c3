//! Root transition into the prepared target directory.

use std::io;
use std::path::Path;

use otaprep_common::error::{PrepError, Result};

/// Makes `target_root` the process's root directory.
///
/// Three sub-steps, each failing independently: chdir into the target,
/// chroot to the current directory, chdir to the new root. There is no
/// rollback; the namespace is reclaimed when the process exits.
///
/// # Errors
///
/// Returns [`PrepError::ChdirTarget`], [`PrepError::Chroot`], or
/// [`PrepError::ChdirNewRoot`] for the sub-step that failed.
pub fn enter_target_root(target_root: &Path) -> Result<()> {
    use nix::unistd::{chdir, chroot};

    chdir(target_root).map_err(|e| PrepError::ChdirTarget {
        target: target_root.to_path_buf(),
        source: io::Error::from_raw_os_error(e as i32),
    })?;

    chroot(".").map_err(|e| PrepError::Chroot {
        source: io::Error::from_raw_os_error(e as i32),
    })?;

    chdir("/").map_err(|e| PrepError::ChdirNewRoot {
        source: io::Error::from_raw_os_error(e as i32),
    })?;

    tracing::info!(root = %target_root.display(), "root transition complete");
    Ok(())
}
