//! Domain primitive types used across the otaprep workspace.

use std::fmt;
use std::path::PathBuf;

use crate::constants::{BLOCK_BY_NAME_DIR, SLOT_SUFFIX_MAX_LEN};
use crate::error::{PrepError, Result};

/// A validated A/B update slot suffix (e.g. `_a`, `_b`).
///
/// The suffix is interpolated into block-device paths, so it is validated
/// once against a restrictive allow-list before any use: non-empty, at
/// most [`SLOT_SUFFIX_MAX_LEN`] bytes, ASCII alphanumeric or underscore
/// only. A value of this type is immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSuffix(String);

impl SlotSuffix {
    /// Validates and wraps a raw suffix string.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::InvalidSlotSuffix`] if the suffix is empty,
    /// too long, or contains any character outside `[A-Za-z0-9_]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let legal = !raw.is_empty()
            && raw.len() <= SLOT_SUFFIX_MAX_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if legal {
            Ok(Self(raw.to_owned()))
        } else {
            Err(PrepError::InvalidSlotSuffix { suffix: raw.to_owned() })
        }
    }

    /// Returns the suffix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the by-name block device path for a partition on this slot.
    #[must_use]
    pub fn block_device(&self, partition: &str) -> PathBuf {
        PathBuf::from(format!("{BLOCK_BY_NAME_DIR}/{partition}{}", self.0))
    }
}

impl fmt::Display for SlotSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of a single bind mount, consumed by exactly one mount call.
#[derive(Debug, Clone)]
pub struct MountMapping {
    /// Existing path exposed at a second location.
    pub source: PathBuf,
    /// Mount point the source is exposed at.
    pub target: PathBuf,
    /// Whether submounts of the source are carried along (`MS_REC`).
    pub recursive: bool,
}

impl MountMapping {
    /// Builds a non-recursive bind mapping.
    #[must_use]
    pub fn bind(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self { source: source.into(), target: target.into(), recursive: false }
    }
}
