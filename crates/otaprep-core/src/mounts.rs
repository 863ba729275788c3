//! Mount construction for the target root.
//!
//! Covers the fixed core bind-mount set, the best-effort vendor/product
//! partition mounts, and the tmpfs-backed APEX mount directory. All
//! mount syscalls go through the [`Mounter`] seam so orchestration
//! behavior (ordering, abort-on-first-failure, tolerated failures) can
//! be tested without privileges.

use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use otaprep_common::constants::{
    APEX_MOUNT_DIR, CORE_BIND_DIRS, OPTIONAL_PARTITIONS, PARTITION_FS_TYPE, TARGET_ROOT,
};
use otaprep_common::error::{PrepError, Result};
use otaprep_common::types::{MountMapping, SlotSuffix};

use crate::selinux;

/// Issues mount syscalls on behalf of the orchestrator.
///
/// The production implementation is [`SysMounter`]; tests substitute a
/// recording mock.
pub trait Mounter {
    /// Bind-mounts `source` onto `target` (`MS_REC` when `recursive`).
    fn bind(&self, source: &Path, target: &Path, recursive: bool) -> io::Result<()>;

    /// Mounts `device` read-only at `target` with the given filesystem type.
    fn mount_readonly(&self, device: &Path, target: &Path, fstype: &str) -> io::Result<()>;

    /// Mounts a `nodev,noexec,nosuid` tmpfs at `target`.
    fn mount_tmpfs(&self, target: &Path) -> io::Result<()>;
}

/// [`Mounter`] backed by `mount(2)` via nix.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysMounter;

impl Mounter for SysMounter {
    fn bind(&self, source: &Path, target: &Path, recursive: bool) -> io::Result<()> {
        use nix::mount::{MsFlags, mount};

        let mut flags = MsFlags::MS_BIND;
        if recursive {
            flags |= MsFlags::MS_REC;
        }
        mount(Some(source), target, None::<&str>, flags, None::<&str>)
            .map_err(|e| io::Error::from_raw_os_error(e as i32))
    }

    fn mount_readonly(&self, device: &Path, target: &Path, fstype: &str) -> io::Result<()> {
        use nix::mount::{MsFlags, mount};

        mount(Some(device), target, Some(fstype), MsFlags::MS_RDONLY, None::<&str>)
            .map_err(|e| io::Error::from_raw_os_error(e as i32))
    }

    fn mount_tmpfs(&self, target: &Path) -> io::Result<()> {
        use nix::mount::{MsFlags, mount};

        let flags = MsFlags::MS_NODEV | MsFlags::MS_NOEXEC | MsFlags::MS_NOSUID;
        mount(Some("tmpfs"), target, Some("tmpfs"), flags, None::<&str>)
            .map_err(|e| io::Error::from_raw_os_error(e as i32))
    }
}

/// Returns the fixed core bind mappings, in mount order.
#[must_use]
pub fn core_bind_mappings() -> Vec<MountMapping> {
    CORE_BIND_DIRS
        .iter()
        .map(|dir| MountMapping::bind(*dir, format!("{TARGET_ROOT}{dir}")))
        .collect()
}

/// Bind-mounts the core set of live directories into the target root.
///
/// Aborts at the first failing entry; the mounts already made are
/// reclaimed by namespace teardown on process exit, so no rollback is
/// attempted here.
///
/// # Errors
///
/// Returns [`PrepError::BindMount`] for the first entry whose mount
/// syscall fails.
pub fn mount_core_binds(mounter: &dyn Mounter) -> Result<()> {
    for mapping in core_bind_mappings() {
        mounter
            .bind(&mapping.source, &mapping.target, mapping.recursive)
            .map_err(|source| PrepError::BindMount {
                source_path: mapping.source.clone(),
                target: mapping.target.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Attempts read-only mounts of the vendor and product partitions.
///
/// The update engine does not mount these; they are wanted only so the
/// optimizer can see vendor/product APKs. The partitions may not exist
/// on every device configuration, so failures are tolerated: each one
/// becomes a best-effort [`PrepError::PartitionMount`], traced at debug
/// level only and returned for inspection. The pipeline discards the
/// returned list, preserving this step's silence.
pub fn mount_optional_partitions(mounter: &dyn Mounter, slot: &SlotSuffix) -> Vec<PrepError> {
    let mut tolerated = Vec::new();
    for partition in OPTIONAL_PARTITIONS {
        let device = slot.block_device(partition);
        let target = PathBuf::from(format!("{TARGET_ROOT}/{partition}"));
        if let Err(source) = mounter.mount_readonly(&device, &target, PARTITION_FS_TYPE) {
            let err = PrepError::PartitionMount { device, target, source };
            tracing::debug!(%err, "optional partition not mounted");
            tolerated.push(err);
        }
    }
    tolerated
}

/// Prepares the APEX mount directory under the target root.
///
/// Mirrors what init does for `/apex`, except the SELinux relabel runs
/// immediately after the tmpfs mount: the subsequent `chmod` and `chown`
/// are policy-gated on the directory already carrying the
/// `postinstall_apex_mnt_dir` label.
///
/// # Errors
///
/// Returns [`PrepError::ApexTmpfs`], [`PrepError::Restorecon`],
/// [`PrepError::ApexChmod`], or [`PrepError::ApexChown`] for the first
/// sub-step that fails.
pub fn setup_apex_mount_dir(mounter: &dyn Mounter) -> Result<()> {
    let dir = Path::new(APEX_MOUNT_DIR);

    mounter.mount_tmpfs(dir).map_err(|source| PrepError::ApexTmpfs {
        target: dir.to_path_buf(),
        source,
    })?;

    selinux::restorecon(dir)?;

    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        PrepError::ApexChmod { target: dir.to_path_buf(), source }
    })?;

    nix::unistd::chown(
        dir,
        Some(nix::unistd::Uid::from_raw(0)),
        Some(nix::unistd::Gid::from_raw(0)),
    )
    .map_err(|e| PrepError::ApexChown {
        target: dir.to_path_buf(),
        source: io::Error::from_raw_os_error(e as i32),
    })?;

    Ok(())
}
