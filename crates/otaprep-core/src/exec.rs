//! Hand-off to the optimizer subprocess.

use std::process::Command;

use otaprep_common::constants::OTAPREOPT_BIN;
use otaprep_common::error::{PrepError, Result};
use otaprep_common::types::SlotSuffix;

/// Derives the optimizer's argument vector from the invocation.
///
/// The caller's program name and status-channel descriptor are dropped;
/// the optimizer path takes position 0, followed by the slot suffix and
/// the forwarded arguments verbatim.
#[must_use]
pub fn handoff_args(slot: &SlotSuffix, forwarded: &[String]) -> Vec<String> {
    let mut argv = Vec::with_capacity(forwarded.len() + 2);
    argv.push(OTAPREOPT_BIN.to_owned());
    argv.push(slot.as_str().to_owned());
    argv.extend(forwarded.iter().cloned());
    argv
}

/// Runs the optimizer and waits unconditionally for it to exit.
///
/// This is the single suspension point of the whole procedure; there is
/// no timeout and no cancellation.
///
/// # Errors
///
/// Returns [`PrepError::Handoff`] if the child cannot be spawned or
/// exits unsuccessfully. The caller surfaces this only after teardown.
pub fn run_optimizer(argv: &[String]) -> Result<()> {
    let Some((program, args)) = argv.split_first() else {
        return Err(PrepError::Handoff { message: "empty argument vector".into() });
    };

    let status = Command::new(program).args(args).status().map_err(|e| PrepError::Handoff {
        message: format!("failed to spawn {program}: {e}"),
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(PrepError::Handoff { message: format!("{program} exited with {status}") })
    }
}
