//! SELinux relabeling via the platform's `restorecon` tool.

use std::path::Path;
use std::process::Command;

use otaprep_common::constants::RESTORECON_BIN;
use otaprep_common::error::{PrepError, Result};

/// Restores the SELinux context of `path` from the loaded file contexts.
///
/// # Errors
///
/// Returns [`PrepError::Restorecon`] if the tool cannot be spawned or
/// exits unsuccessfully.
pub fn restorecon(path: &Path) -> Result<()> {
    let status = Command::new(RESTORECON_BIN).arg(path).status().map_err(|e| {
        PrepError::Restorecon {
            target: path.to_path_buf(),
            message: format!("failed to run {RESTORECON_BIN}: {e}"),
        }
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(PrepError::Restorecon {
            target: path.to_path_buf(),
            message: format!("{RESTORECON_BIN} exited with {status}"),
        })
    }
}
