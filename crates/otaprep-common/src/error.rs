//! Unified error type for the otaprep workspace.
//!
//! Every fatal failure site in the preparation procedure maps to its own
//! process exit code, so the calling supervisor can tell *where* a run
//! failed without parsing log text. Best-effort failures carry no exit
//! code; they are logged (or deliberately ignored) and the run continues.

use std::path::PathBuf;

use thiserror::Error;

/// How a failed operation affects the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Terminates the process with the variant's exit code.
    Fatal,
    /// Logged or ignored; the procedure continues.
    BestEffort,
}

/// Failure at any step of the chroot preparation procedure.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Fewer than the required positional arguments were supplied.
    #[error("not enough arguments")]
    InsufficientArgs,

    /// Creating the private mount namespace failed.
    #[error("failed to unshare mount namespace: {source}")]
    Unshare {
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Remounting the target root as private failed.
    #[error("failed to remount {root} as private: {source}")]
    PrivateRemount {
        /// Target root that could not be made private.
        root: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// One of the fixed core bind mounts failed.
    #[error("failed to bind-mount {source_path} to {target}: {source}")]
    BindMount {
        /// Live directory being exposed under the target root.
        source_path: PathBuf,
        /// Mount point under the target root.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The target slot suffix failed the allow-listed pattern.
    #[error("target slot suffix not legal: {suffix:?}")]
    InvalidSlotSuffix {
        /// The rejected suffix, verbatim.
        suffix: String,
    },

    /// Mounting a vendor or product partition failed (tolerated).
    #[error("failed to mount {device} on {target}: {source}")]
    PartitionMount {
        /// Block device derived from the slot suffix.
        device: PathBuf,
        /// Mount point under the target root.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Mounting the tmpfs backing the APEX mount directory failed.
    #[error("failed to mount tmpfs on {target}: {source}")]
    ApexTmpfs {
        /// The APEX mount directory.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Restoring the SELinux context of the APEX mount directory failed.
    #[error("failed to restore security context of {target}: {message}")]
    Restorecon {
        /// The APEX mount directory.
        target: PathBuf,
        /// Diagnostic from the labeling tool.
        message: String,
    },

    /// Setting permissions on the APEX mount directory failed.
    #[error("failed to chmod {target} to 0755: {source}")]
    ApexChmod {
        /// The APEX mount directory.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Setting ownership of the APEX mount directory failed.
    #[error("failed to chown {target} to root:root: {source}")]
    ApexChown {
        /// The APEX mount directory.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Changing the working directory into the target root failed.
    #[error("unable to chdir into {target}: {source}")]
    ChdirTarget {
        /// The target root.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The chroot into the target root failed.
    #[error("failed to chroot: {source}")]
    Chroot {
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Changing the working directory to the new root failed.
    #[error("unable to chdir into new root: {source}")]
    ChdirNewRoot {
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A 32-bit Bionic overlay bind mount failed.
    #[error("failed to mount 32-bit Bionic artifacts: {source_path} -> {target}: {source}")]
    Bionic32 {
        /// Library or linker path inside the runtime package.
        source_path: PathBuf,
        /// Fixed system mount point.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A 64-bit Bionic overlay bind mount failed.
    #[error("failed to mount 64-bit Bionic artifacts: {source_path} -> {target}: {source}")]
    Bionic64 {
        /// Library or linker path inside the runtime package.
        source_path: PathBuf,
        /// Fixed system mount point.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Running the optimizer subprocess failed.
    #[error("running the optimizer failed: {message}")]
    Handoff {
        /// Diagnostic text describing the spawn or exit failure.
        message: String,
    },

    /// Deactivating a single package failed (tolerated).
    #[error("failed to deactivate {package}: {message}")]
    Deactivate {
        /// Path of the package that stayed active.
        package: PathBuf,
        /// Diagnostic from the activation engine.
        message: String,
    },
}

impl PrepError {
    /// Returns whether this failure terminates the invocation.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::PartitionMount { .. } | Self::Deactivate { .. } => Severity::BestEffort,
            _ => Severity::Fatal,
        }
    }

    /// Process exit code reported to the calling supervisor.
    ///
    /// Best-effort failures never terminate the process and have no code.
    /// Fatal codes are pairwise distinct and stable; a supervisor relies
    /// on them to locate the failing step.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Unshare { .. } => Some(200),
            Self::PrivateRemount { .. } => Some(201),
            Self::BindMount { .. } => Some(202),
            Self::ChdirTarget { .. } => Some(203),
            Self::Chroot { .. } => Some(204),
            Self::ChdirNewRoot { .. } => Some(205),
            Self::InvalidSlotSuffix { .. } => Some(207),
            Self::InsufficientArgs => Some(208),
            Self::ApexTmpfs { .. } => Some(209),
            Self::ApexChmod { .. } => Some(210),
            Self::ApexChown { .. } => Some(211),
            Self::Handoff { .. } => Some(213),
            Self::Restorecon { .. } => Some(214),
            Self::Bionic32 { .. } => Some(215),
            Self::Bionic64 { .. } => Some(216),
            Self::PartitionMount { .. } | Self::Deactivate { .. } => None,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fatal_variants() -> Vec<PrepError> {
        let io = || std::io::Error::from_raw_os_error(libc_eacces());
        vec![
            PrepError::InsufficientArgs,
            PrepError::Unshare { source: io() },
            PrepError::PrivateRemount { root: "/postinstall".into(), source: io() },
            PrepError::BindMount {
                source_path: "/data".into(),
                target: "/postinstall/data".into(),
                source: io(),
            },
            PrepError::InvalidSlotSuffix { suffix: "../x".into() },
            PrepError::ApexTmpfs { target: "/postinstall/apex".into(), source: io() },
            PrepError::Restorecon { target: "/postinstall/apex".into(), message: "denied".into() },
            PrepError::ApexChmod { target: "/postinstall/apex".into(), source: io() },
            PrepError::ApexChown { target: "/postinstall/apex".into(), source: io() },
            PrepError::ChdirTarget { target: "/postinstall".into(), source: io() },
            PrepError::Chroot { source: io() },
            PrepError::ChdirNewRoot { source: io() },
            PrepError::Bionic32 {
                source_path: "/apex/com.android.runtime/bin/linker".into(),
                target: "/bionic/bin/linker".into(),
                source: io(),
            },
            PrepError::Bionic64 {
                source_path: "/apex/com.android.runtime/bin/linker64".into(),
                target: "/bionic/bin/linker64".into(),
                source: io(),
            },
            PrepError::Handoff { message: "exec failed".into() },
        ]
    }

    const fn libc_eacces() -> i32 {
        13
    }

    #[test]
    fn fatal_exit_codes_are_pairwise_distinct() {
        let variants = fatal_variants();
        let mut codes = Vec::new();
        for err in &variants {
            assert_eq!(err.severity(), Severity::Fatal, "{err}");
            let code = err.exit_code().unwrap_or_else(|| panic!("fatal without code: {err}"));
            assert!(!codes.contains(&code), "exit code {code} reused by {err}");
            codes.push(code);
        }
        assert_eq!(codes.len(), variants.len());
    }

    #[test]
    fn best_effort_failures_have_no_exit_code() {
        let io = std::io::Error::from_raw_os_error(libc_eacces());
        let partition = PrepError::PartitionMount {
            device: "/dev/block/by-name/vendor_b".into(),
            target: "/postinstall/vendor".into(),
            source: io,
        };
        assert_eq!(partition.severity(), Severity::BestEffort);
        assert_eq!(partition.exit_code(), None);

        let deactivate = PrepError::Deactivate {
            package: "/system/apex/com.android.runtime.apex".into(),
            message: "still referenced".into(),
        };
        assert_eq!(deactivate.severity(), Severity::BestEffort);
        assert_eq!(deactivate.exit_code(), None);
    }

    #[test]
    fn insufficient_args_maps_to_208() {
        assert_eq!(PrepError::InsufficientArgs.exit_code(), Some(208));
    }
}
