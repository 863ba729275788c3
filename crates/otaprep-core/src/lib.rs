//! Privileged setup primitives for the OTA chroot environment.
//!
//! Each module wraps one step of the preparation procedure: descriptor
//! hygiene, mount-namespace creation, the bind/partition/tmpfs mounts,
//! APEX package activation, the Bionic runtime overlay, the root
//! transition, and the final hand-off to the optimizer.
//!
//! Mount operations go through the [`mounts::Mounter`] seam and package
//! activation through the [`apex::ApexEngine`] seam, so the ordering and
//! rollback guarantees of the orchestration can be tested without
//! issuing real syscalls.

pub mod apex;
pub mod bionic;
pub mod chroot;
pub mod descriptor;
pub mod exec;
pub mod mounts;
pub mod namespace;
pub mod selinux;

#[cfg(test)]
pub(crate) mod test_support;
