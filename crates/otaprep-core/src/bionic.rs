//! Bionic runtime overlay from the activated runtime package.
//!
//! After the root transition, the dynamic linker and the three core
//! runtime libraries are bind-mounted from the runtime APEX onto their
//! fixed system mount points, once per architecture variant. A device
//! may be single-architecture: a missing linker source means the variant
//! is inapplicable and the overlay succeeds without issuing any mount.

use std::io;
use std::path::{Path, PathBuf};

use otaprep_common::constants::{
    BIONIC_LIB_NAMES, BIONIC_LIBS_MOUNT_DIR, BIONIC_LIBS_MOUNT_DIR_64, LINKER_MOUNT_POINT,
    LINKER_MOUNT_POINT_64, RUNTIME_BIONIC_LIBS_DIR, RUNTIME_BIONIC_LIBS_DIR_64,
    RUNTIME_LINKER_PATH, RUNTIME_LINKER_PATH_64,
};
use otaprep_common::error::{PrepError, Result};

use crate::mounts::Mounter;

/// Architecture variant of the Bionic overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 32-bit linker and libraries.
    Bit32,
    /// 64-bit linker and libraries.
    Bit64,
}

/// Source and mount-point layout for one architecture's overlay.
#[derive(Debug, Clone)]
pub struct BionicVariant {
    arch: Arch,
    linker_source: PathBuf,
    libs_source_dir: PathBuf,
    linker_mount_point: PathBuf,
    libs_mount_dir: PathBuf,
}

impl BionicVariant {
    /// The 32-bit layout at its fixed platform paths.
    #[must_use]
    pub fn bit32() -> Self {
        Self {
            arch: Arch::Bit32,
            linker_source: RUNTIME_LINKER_PATH.into(),
            libs_source_dir: RUNTIME_BIONIC_LIBS_DIR.into(),
            linker_mount_point: LINKER_MOUNT_POINT.into(),
            libs_mount_dir: BIONIC_LIBS_MOUNT_DIR.into(),
        }
    }

    /// The 64-bit layout at its fixed platform paths.
    #[must_use]
    pub fn bit64() -> Self {
        Self {
            arch: Arch::Bit64,
            linker_source: RUNTIME_LINKER_PATH_64.into(),
            libs_source_dir: RUNTIME_BIONIC_LIBS_DIR_64.into(),
            linker_mount_point: LINKER_MOUNT_POINT_64.into(),
            libs_mount_dir: BIONIC_LIBS_MOUNT_DIR_64.into(),
        }
    }

    /// A variant with custom paths, for tests.
    #[must_use]
    pub fn with_paths(
        arch: Arch,
        linker_source: impl Into<PathBuf>,
        libs_source_dir: impl Into<PathBuf>,
        linker_mount_point: impl Into<PathBuf>,
        libs_mount_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            arch,
            linker_source: linker_source.into(),
            libs_source_dir: libs_source_dir.into(),
            linker_mount_point: linker_mount_point.into(),
            libs_mount_dir: libs_mount_dir.into(),
        }
    }

    fn error(&self, source_path: &Path, target: &Path, source: io::Error) -> PrepError {
        match self.arch {
            Arch::Bit32 => PrepError::Bionic32 {
                source_path: source_path.to_path_buf(),
                target: target.to_path_buf(),
                source,
            },
            Arch::Bit64 => PrepError::Bionic64 {
                source_path: source_path.to_path_buf(),
                target: target.to_path_buf(),
                source,
            },
        }
    }
}

/// Overlays one architecture variant.
///
/// Succeeds trivially, issuing zero mount syscalls, when the linker
/// source does not exist.
///
/// # Errors
///
/// Returns [`PrepError::Bionic32`] or [`PrepError::Bionic64`] for the
/// first required bind mount that fails. The caller owes a deactivation
/// of the activated package set before exiting on this error.
pub fn overlay_variant(mounter: &dyn Mounter, variant: &BionicVariant) -> Result<()> {
    if !variant.linker_source.exists() {
        tracing::info!(
            linker = %variant.linker_source.display(),
            "linker source absent; skipping Bionic overlay for this architecture"
        );
        return Ok(());
    }

    mounter
        .bind(&variant.linker_source, &variant.linker_mount_point, false)
        .map_err(|e| variant.error(&variant.linker_source, &variant.linker_mount_point, e))?;

    for libname in BIONIC_LIB_NAMES {
        let source = variant.libs_source_dir.join(libname);
        let mount_point = variant.libs_mount_dir.join(libname);
        mounter
            .bind(&source, &mount_point, false)
            .map_err(|e| variant.error(&source, &mount_point, e))?;
    }
    Ok(())
}

/// Overlays both architecture variants at their fixed platform paths.
///
/// # Errors
///
/// Propagates the first variant failure; the 64-bit variant is not
/// attempted once the 32-bit variant has failed.
pub fn overlay_all(mounter: &dyn Mounter) -> Result<()> {
    overlay_variant(mounter, &BionicVariant::bit32())?;
    overlay_variant(mounter, &BionicVariant::bit64())
}
