//! Mount-namespace creation and propagation control.
//!
//! Both operations here are prerequisites for everything that follows:
//! without a private namespace, every later bind mount would mutate the
//! live system's mount table.

use std::io;
use std::path::Path;

use otaprep_common::error::{PrepError, Result};

/// Detaches the process into its own mount namespace, then marks the
/// target root non-propagating.
///
/// After this call, mounts made by this process are invisible to the
/// original namespace and are reclaimed by the kernel when the process
/// exits.
///
/// # Errors
///
/// Returns [`PrepError::Unshare`] if `unshare(CLONE_NEWNS)` fails, or
/// [`PrepError::PrivateRemount`] if the `MS_PRIVATE` remount of the
/// target root fails.
pub fn enter_private_namespace(target_root: &Path) -> Result<()> {
    use nix::mount::{MsFlags, mount};
    use nix::sched::{CloneFlags, unshare};

    unshare(CloneFlags::CLONE_NEWNS).map_err(|e| PrepError::Unshare {
        source: io::Error::from_raw_os_error(e as i32),
    })?;
    tracing::debug!("mount namespace created");

    mount(None::<&str>, target_root, None::<&str>, MsFlags::MS_PRIVATE, None::<&str>).map_err(
        |e| PrepError::PrivateRemount {
            root: target_root.to_path_buf(),
            source: io::Error::from_raw_os_error(e as i32),
        },
    )?;
    tracing::debug!(root = %target_root.display(), "target root made private");

    Ok(())
}
