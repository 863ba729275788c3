//! APEX package activation and guaranteed deactivation.
//!
//! The activation engine itself (scanning, verification, the actual
//! mounting of package images) is the platform's concern; it is consumed
//! here through the [`ApexEngine`] capability. What this module owns is
//! the lifecycle invariant: every package that was activated during an
//! invocation is deactivated exactly once before the process exits, on
//! every exit path. That is enforced by [`ActivatedPackages`], a scoped
//! guard that performs deactivation on drop. Activation state lives
//! outside the mount namespace, so exit-time namespace teardown alone
//! would not reclaim it.

use std::path::{Path, PathBuf};
use std::process::Command;

use otaprep_common::constants::{APEX_EXTENSION, APEXD_BIN};
use otaprep_common::error::PrepError;

/// Activate-all / deactivate capability of the package activation engine.
pub trait ApexEngine {
    /// Scans `scan_dir` and activates every installable package found.
    ///
    /// Returns the packages that were successfully activated (possibly
    /// empty). Individual activation failures are the engine's own
    /// concern and never abort the invocation.
    fn activate_all(&self, scan_dir: &Path) -> Vec<PathBuf>;

    /// Requests deactivation of a previously activated package.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic message if the engine refuses or fails.
    fn deactivate(&self, package: &Path) -> Result<(), String>;
}

/// Production engine driving the platform's apexd.
#[derive(Debug, Default, Clone, Copy)]
pub struct Apexd;

impl Apexd {
    fn drive(verb: &str, package: &Path) -> Result<(), String> {
        let status = Command::new(APEXD_BIN)
            .arg(verb)
            .arg(package)
            .status()
            .map_err(|e| format!("failed to run {APEXD_BIN}: {e}"))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{APEXD_BIN} {verb} exited with {status}"))
        }
    }
}

impl ApexEngine for Apexd {
    fn activate_all(&self, scan_dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(scan_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %scan_dir.display(), error = %e, "package scan failed");
                return Vec::new();
            }
        };

        let mut activated = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(APEX_EXTENSION) {
                continue;
            }
            match Self::drive("--activate", &path) {
                Ok(()) => activated.push(path),
                Err(message) => {
                    tracing::warn!(package = %path.display(), message, "activation failed");
                }
            }
        }
        activated.sort();
        activated
    }

    fn deactivate(&self, package: &Path) -> Result<(), String> {
        Self::drive("--deactivate", package)
    }
}

/// Owned set of activated packages; deactivates every member on drop.
///
/// Individual deactivation failures are logged and do not stop the
/// remaining deactivations: leaving a package activated after exit is
/// the worst outcome, so every member gets its attempt.
pub struct ActivatedPackages<'e> {
    engine: &'e dyn ApexEngine,
    packages: Vec<PathBuf>,
}

impl<'e> ActivatedPackages<'e> {
    /// Activates everything under `scan_dir` and takes ownership of the
    /// resulting set.
    pub fn activate_all(engine: &'e dyn ApexEngine, scan_dir: &Path) -> Self {
        let packages = engine.activate_all(scan_dir);
        tracing::info!(count = packages.len(), dir = %scan_dir.display(), "packages activated");
        Self { engine, packages }
    }

    /// The activated package paths, in activation order.
    #[must_use]
    pub fn packages(&self) -> &[PathBuf] {
        &self.packages
    }

    /// Number of activated packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether no package was activated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl Drop for ActivatedPackages<'_> {
    fn drop(&mut self) {
        for package in &self.packages {
            if let Err(message) = self.engine.deactivate(package) {
                let err = PrepError::Deactivate { package: package.clone(), message };
                tracing::error!(%err, "package deactivation failed");
            }
        }
    }
}
