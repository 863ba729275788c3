//! Fixed paths and names of the OTA chroot environment.
//!
//! Every path here is part of the platform's filesystem contract: the
//! target root is pre-created by the update engine, block devices follow
//! the `by-name/<partition><slot-suffix>` convention, and the Bionic
//! mount points are baked into the system image.

/// Root of the prepared filesystem view; pre-created by the update engine.
pub const TARGET_ROOT: &str = "/postinstall";

/// Live directories bind-mounted into the target root, in mount order.
pub const CORE_BIND_DIRS: [&str; 4] = ["/data", "/dev", "/proc", "/sys"];

/// Directory of partition block devices addressed by name.
pub const BLOCK_BY_NAME_DIR: &str = "/dev/block/by-name";

/// Partitions mounted best-effort for APK visibility, by base name.
pub const OPTIONAL_PARTITIONS: [&str; 2] = ["vendor", "product"];

/// Filesystem type used for the optional partition mounts.
pub const PARTITION_FS_TYPE: &str = "ext4";

/// APEX mount directory under the target root (pre-chroot path).
pub const APEX_MOUNT_DIR: &str = "/postinstall/apex";

/// Package scan directory, as seen after the root transition.
pub const APEX_SCAN_DIR: &str = "/system/apex";

/// File extension of installable APEX packages.
pub const APEX_EXTENSION: &str = "apex";

/// Optimizer executable run inside the prepared root.
pub const OTAPREOPT_BIN: &str = "/system/bin/otapreopt";

/// Platform tool that restores SELinux file contexts.
pub const RESTORECON_BIN: &str = "/system/bin/restorecon";

/// Package activation daemon driven by the activation engine.
pub const APEXD_BIN: &str = "/system/bin/apexd";

/// Upper bound on slot suffix length, in bytes.
pub const SLOT_SUFFIX_MAX_LEN: usize = 16;

// Bind-mounted Bionic artifacts from the runtime package.

/// 32-bit dynamic linker mount point.
pub const LINKER_MOUNT_POINT: &str = "/bionic/bin/linker";
/// 32-bit dynamic linker inside the activated runtime package.
pub const RUNTIME_LINKER_PATH: &str = "/apex/com.android.runtime/bin/linker";
/// 32-bit core library mount-point directory.
pub const BIONIC_LIBS_MOUNT_DIR: &str = "/bionic/lib";
/// 32-bit core library source directory inside the runtime package.
pub const RUNTIME_BIONIC_LIBS_DIR: &str = "/apex/com.android.runtime/lib/bionic";

/// 64-bit dynamic linker mount point.
pub const LINKER_MOUNT_POINT_64: &str = "/bionic/bin/linker64";
/// 64-bit dynamic linker inside the activated runtime package.
pub const RUNTIME_LINKER_PATH_64: &str = "/apex/com.android.runtime/bin/linker64";
/// 64-bit core library mount-point directory.
pub const BIONIC_LIBS_MOUNT_DIR_64: &str = "/bionic/lib64";
/// 64-bit core library source directory inside the runtime package.
pub const RUNTIME_BIONIC_LIBS_DIR_64: &str = "/apex/com.android.runtime/lib64/bionic";

/// Core runtime libraries overlaid for each architecture.
pub const BIONIC_LIB_NAMES: [&str; 3] = ["libc.so", "libm.so", "libdl.so"];
