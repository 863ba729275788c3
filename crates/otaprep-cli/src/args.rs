//! Positional argument extraction.
//!
//! The invocation contract is order-significant and minimal:
//! `otaprep_chroot <status-fd> <target-slot> <dexopt-args...>`. Nothing
//! beyond positional extraction happens here; the forwarded arguments
//! are opaque and passed through verbatim, hyphens included.

use clap::Parser;

use otaprep_common::error::{PrepError, Result};

/// Arguments supplied by the calling update engine.
#[derive(Debug, Parser)]
#[command(name = "otaprep_chroot", disable_help_flag = true, disable_version_flag = true)]
pub struct Invocation {
    /// Caller-owned status channel descriptor; closed, never written.
    pub status_fd: String,

    /// Raw target slot suffix; validated before any partition mount.
    pub target_slot: String,

    /// Arguments forwarded verbatim to the optimizer.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub dexopt_args: Vec<String>,
}

impl Invocation {
    /// Extracts the invocation from an argument list.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::InsufficientArgs`] when the required
    /// positionals are missing, so the process can exit with the
    /// insufficient-arguments code before any privileged action.
    pub fn extract<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| {
            tracing::error!(error = %e, "not enough arguments");
            PrepError::InsufficientArgs
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_three_arguments_is_insufficient() {
        for args in [vec!["otaprep_chroot"], vec!["otaprep_chroot", "5"]] {
            let err = Invocation::extract(args).unwrap_err();
            assert!(matches!(err, PrepError::InsufficientArgs));
            assert_eq!(err.exit_code(), Some(208));
        }
    }

    #[test]
    fn minimum_invocation_has_no_forwarded_args() {
        let inv = Invocation::extract(["otaprep_chroot", "5", "_b"]).unwrap();
        assert_eq!(inv.status_fd, "5");
        assert_eq!(inv.target_slot, "_b");
        assert!(inv.dexopt_args.is_empty());
    }

    #[test]
    fn forwarded_args_pass_through_verbatim_including_flags() {
        let inv =
            Invocation::extract(["otaprep_chroot", "5", "_b", "dexopt", "--flag", "-x"]).unwrap();
        assert_eq!(inv.dexopt_args, vec!["dexopt", "--flag", "-x"]);
    }

    #[test]
    fn slot_suffix_is_not_interpreted_here() {
        // Validation happens in the pipeline, with its own exit code.
        let inv = Invocation::extract(["otaprep_chroot", "5", "../etc"]).unwrap();
        assert_eq!(inv.target_slot, "../etc");
    }
}
