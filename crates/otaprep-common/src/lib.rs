//! Shared foundations for the otaprep workspace.
//!
//! Contains the workspace-wide error type with its exit-code mapping,
//! the fixed path constants of the OTA chroot environment, and the
//! validated domain primitives used across crates.

pub mod constants;
pub mod error;
pub mod types;
