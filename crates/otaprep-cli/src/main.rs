//! # `otaprep_chroot` — OTA dexopt chroot preparation helper
//!
//! Invoked once per over-the-air update by the update engine:
//! `otaprep_chroot <status-fd> <target-slot> <dexopt-args...>`.
//! Prepares an isolated mount-namespace view of the freshly installed
//! image under `/postinstall`, hands off to the dex optimizer inside
//! it, and tears down activated packages before exiting. The exit code
//! identifies the failing step; 0 means the optimizer ran successfully.

mod args;
mod pipeline;

use std::process::exit;

use crate::args::Invocation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let invocation = match Invocation::extract(argv) {
        Ok(invocation) => invocation,
        Err(err) => exit(err.exit_code().unwrap_or(1)),
    };

    if let Err(err) = pipeline::run(&invocation) {
        tracing::error!(%err, "OTA chroot preparation failed");
        // The pipeline only surfaces fatal errors, each with its code.
        exit(err.exit_code().unwrap_or(1));
    }
}
