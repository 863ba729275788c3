//! Recording mock for the [`Mounter`](crate::mounts::Mounter) seam.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use crate::mounts::Mounter;

/// One recorded mount syscall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountCall {
    /// Source path (device, directory, or `tmpfs`).
    pub source: PathBuf,
    /// Mount point.
    pub target: PathBuf,
    /// Filesystem type, if any (`None` for bind mounts).
    pub fstype: Option<String>,
    /// Whether this was a recursive bind.
    pub recursive: bool,
}

impl MountCall {
    pub fn bind(source: &str, target: &str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            fstype: None,
            recursive: false,
        }
    }

    pub fn readonly(source: &str, target: &str, fstype: &str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            fstype: Some(fstype.to_owned()),
            recursive: false,
        }
    }
}

/// Mounter that records every call and fails on configured targets.
#[derive(Debug, Default)]
pub struct RecordingMounter {
    calls: RefCell<Vec<MountCall>>,
    fail_targets: Vec<PathBuf>,
}

impl RecordingMounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mounter whose calls against `target` fail with `EACCES`.
    pub fn failing_on(target: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_targets: vec![PathBuf::from(target)],
        }
    }

    /// Snapshot of the recorded calls, in issue order.
    pub fn calls(&self) -> Vec<MountCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: MountCall) -> io::Result<()> {
        let failing = self.fail_targets.iter().any(|t| t == &call.target);
        self.calls.borrow_mut().push(call);
        if failing {
            Err(io::Error::from_raw_os_error(libc::EACCES))
        } else {
            Ok(())
        }
    }
}

impl Mounter for RecordingMounter {
    fn bind(&self, source: &Path, target: &Path, recursive: bool) -> io::Result<()> {
        self.record(MountCall {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            fstype: None,
            recursive,
        })
    }

    fn mount_readonly(&self, device: &Path, target: &Path, fstype: &str) -> io::Result<()> {
        self.record(MountCall {
            source: device.to_path_buf(),
            target: target.to_path_buf(),
            fstype: Some(fstype.to_owned()),
            recursive: false,
        })
    }

    fn mount_tmpfs(&self, target: &Path) -> io::Result<()> {
        self.record(MountCall {
            source: PathBuf::from("tmpfs"),
            target: target.to_path_buf(),
            fstype: Some("tmpfs".to_owned()),
            recursive: false,
        })
    }
}
