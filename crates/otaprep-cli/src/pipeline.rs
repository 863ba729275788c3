//! The ordered preparation pipeline.
//!
//! Strictly sequential, fail-stop: the first fatal error is returned to
//! `main`, which maps it to its exit code. Each step's precondition is
//! established by the step before it; no step is retried. The activated
//! package set is held by a scoped guard, so deactivation runs on every
//! path out of the pipeline once activation has happened — including
//! the Bionic overlay failures, which occur after the root transition
//! when namespace teardown alone can no longer undo activation state.
//!
//! Mounts go through the [`Mounter`] seam, activation through
//! [`ApexEngine`], and the remaining process-global steps through the
//! private [`Host`] seam, so the sequencing and rollback guarantees of
//! the whole run are testable without privileges.

use std::path::Path;

use otaprep_common::constants::{APEX_SCAN_DIR, TARGET_ROOT};
use otaprep_common::error::Result;
use otaprep_common::types::SlotSuffix;
use otaprep_core::apex::{ActivatedPackages, Apexd, ApexEngine};
use otaprep_core::mounts::{Mounter, SysMounter};
use otaprep_core::{bionic, chroot, descriptor, exec, mounts, namespace};

use crate::args::Invocation;

/// Process-global steps not already behind the mount or activation seams.
trait Host {
    /// Closes every descriptor inherited from the caller.
    fn close_inherited(&self, status_fd: &str);

    /// Creates the private mount namespace around the target root.
    fn enter_private_namespace(&self, target_root: &Path) -> Result<()>;

    /// Mounts, relabels, and fixes up the APEX mount directory.
    fn setup_apex_mount_dir(&self, mounter: &dyn Mounter) -> Result<()>;

    /// Performs the root transition into the target root.
    fn enter_target_root(&self, target_root: &Path) -> Result<()>;

    /// Overlays the Bionic artifacts for both architecture variants.
    fn overlay_bionic(&self, mounter: &dyn Mounter) -> Result<()>;

    /// Runs the optimizer and waits unconditionally for it.
    fn run_optimizer(&self, argv: &[String]) -> Result<()>;
}

/// The real process: every step delegates to its core module.
struct SystemHost;

impl Host for SystemHost {
    fn close_inherited(&self, status_fd: &str) {
        descriptor::close_inherited(status_fd);
    }

    fn enter_private_namespace(&self, target_root: &Path) -> Result<()> {
        namespace::enter_private_namespace(target_root)
    }

    fn setup_apex_mount_dir(&self, mounter: &dyn Mounter) -> Result<()> {
        mounts::setup_apex_mount_dir(mounter)
    }

    fn enter_target_root(&self, target_root: &Path) -> Result<()> {
        chroot::enter_target_root(target_root)
    }

    fn overlay_bionic(&self, mounter: &dyn Mounter) -> Result<()> {
        bionic::overlay_all(mounter)
    }

    fn run_optimizer(&self, argv: &[String]) -> Result<()> {
        exec::run_optimizer(argv)
    }
}

/// Runs the whole preparation-and-handoff procedure.
///
/// # Errors
///
/// Returns the first fatal [`PrepError`](otaprep_common::error::PrepError);
/// every variant carries the exit code for its failure site.
pub fn run(invocation: &Invocation) -> Result<()> {
    run_with(invocation, &SystemHost, &SysMounter, &Apexd)
}

fn run_with(
    invocation: &Invocation,
    host: &dyn Host,
    mounter: &dyn Mounter,
    engine: &dyn ApexEngine,
) -> Result<()> {
    // Nothing inherited from the caller may cross into the isolated
    // subprocess. After this point log output is advisory only.
    host.close_inherited(&invocation.status_fd);

    let target_root = Path::new(TARGET_ROOT);
    host.enter_private_namespace(target_root)?;

    mounts::mount_core_binds(mounter)?;

    // Validated before the suffix is interpolated into any device path.
    let slot = SlotSuffix::parse(&invocation.target_slot)?;

    // Tolerated failures are logged inside; nothing more to do with them.
    let _ = mounts::mount_optional_partitions(mounter, &slot);

    host.setup_apex_mount_dir(mounter)?;

    host.enter_target_root(target_root)?;

    // The runtime APEX is required for the optimizer to run at all.
    // From here on the guard owes a deactivation per activated package.
    let _active = ActivatedPackages::activate_all(engine, Path::new(APEX_SCAN_DIR));

    host.overlay_bionic(mounter)?;

    let argv = exec::handoff_args(&slot, &invocation.dexopt_args);
    host.run_optimizer(&argv)

    // `_active` drops here on every path, deactivating before exit.
}
