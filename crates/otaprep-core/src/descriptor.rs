//! Descriptor hygiene before any privileged action.
//!
//! Everything inherited from the caller is closed so that no descriptor
//! crosses the privilege and namespace boundary into the optimizer
//! subprocess. This step never fails: closing an already-closed or
//! invalid descriptor is ignored, and nothing is logged here because a
//! log write could reopen one of the descriptor numbers just released.

/// Closes a single descriptor, ignoring the result.
fn close_fd(fd: i32) {
    if fd >= 0 {
        // SAFETY: close(2) on an arbitrary non-negative fd is sound; the
        // worst case is EBADF, which is deliberately ignored.
        let _ = unsafe { libc::close(fd) };
    }
}

/// Parses a descriptor identifier leniently and closes it if valid.
///
/// Non-numeric or negative identifiers denote nothing and are ignored.
fn close_named(descriptor: &str) {
    if let Ok(fd) = descriptor.trim().parse::<i32>() {
        close_fd(fd);
    }
}

/// Closes the three standard streams and the caller's status channel.
pub fn close_inherited(status_fd: &str) {
    close_fd(libc::STDIN_FILENO);
    close_fd(libc::STDOUT_FILENO);
    close_fd(libc::STDERR_FILENO);
    close_named(status_fd);
}
