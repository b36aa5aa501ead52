//! `/etc/fstab` rewrite for snapshot-based (transactional) systems.
//!
//! Every line is copied unchanged except the `/etc` overlay mount, which is
//! pointed at the overlay directories of the snapshot the target lives in.
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Warning;

/// Lines starting with this token are replaced.
pub const OVERLAY_PREFIX: &str = "overlay /etc";

/// Snapshot used when none can be inferred from the target path.
pub const DEFAULT_SNAPSHOT: u32 = 1;

const SNAPSHOTS_ROOT: &str = "/.snapshots";

/// The overlay mount line for `snapshot`, without a line terminator.
#[must_use]
pub fn overlay_line(snapshot: u32) -> String {
    format!(
        "overlay /etc overlay defaults,lowerdir=/sysroot/etc,\
         upperdir=/sysroot/var/lib/overlay/{snapshot}/etc,\
         workdir=/sysroot/var/lib/overlay/{snapshot}/work-etc,\
         x-systemd.requires-mounts-for=/var,\
         x-systemd.requires-mounts-for=/sysroot/var,\
         x-initrd.mount 0 0"
    )
}

/// Infer the snapshot number from a target such as `/.snapshots/7/etc/fstab`.
///
/// # Errors
///
/// Returns [`Warning::SnapshotNumberUnparseable`] when the target is not
/// under `/.snapshots/` or its second segment is not a number.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use etcrebase::actions::fstab::snapshot_number;
///
/// assert_eq!(snapshot_number(Path::new("/.snapshots/7/etc/fstab")), Ok(7));
/// assert!(snapshot_number(Path::new("/mnt/etc/fstab")).is_err());
/// ```
pub fn snapshot_number(target: &Path) -> Result<u32, Warning> {
    target
        .strip_prefix(SNAPSHOTS_ROOT)
        .ok()
        .and_then(|rest| rest.iter().next())
        .and_then(|segment| segment.to_str())
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| Warning::SnapshotNumberUnparseable {
            target: target.to_path_buf(),
            fallback: DEFAULT_SNAPSHOT,
        })
}

/// Rewrite fstab `content` for `snapshot`.
///
/// Line terminators of untouched lines are preserved; the replacement line
/// always ends with a newline.
#[must_use]
pub fn rewrite_content(content: &str, snapshot: u32) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if line.starts_with(OVERLAY_PREFIX) {
            out.push_str(&overlay_line(snapshot));
            out.push('\n');
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Copy `source` to `target`, replacing the `/etc` overlay line.
///
/// The snapshot number is only inferred when an overlay line is present. A
/// symlinked target is replaced by a regular file.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the target written.
pub fn rewrite(source: &Path, target: &Path) -> io::Result<()> {
    let content = fs::read_to_string(source)?;
    let has_overlay = content.lines().any(|line| line.starts_with(OVERLAY_PREFIX));
    let snapshot = if has_overlay {
        snapshot_number(target).unwrap_or_else(|warning| {
            tracing::warn!("{warning}");
            DEFAULT_SNAPSHOT
        })
    } else {
        DEFAULT_SNAPSHOT
    };
    super::fs::remove_existing_link(target)?;
    fs::write(target, rewrite_content(&content, snapshot))
}
