//! Filesystem primitives shared by the action strategies.
use std::fs;
use std::io;
use std::path::Path;

/// Create `path` (and any missing ancestors) unless it already exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove `path` if it is a symlink, so later writes do not follow it.
///
/// Does nothing when `path` is absent or is not a link.
///
/// # Errors
///
/// Returns an error if the link exists but cannot be removed.
pub fn remove_existing_link(path: &Path) -> io::Result<()> {
    if path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Copy a single source entry to `target`.
///
/// Regular files are copied byte for byte with their access and modification
/// times. Symlinks are recreated as symlinks pointing at the same place.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the target written.
pub fn copy_entry(source: &Path, target: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(source)?;
    remove_existing_link(target)?;

    if meta.file_type().is_symlink() {
        return copy_link(source, target);
    }

    fs::copy(source, target)?;
    let times = fs::FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);
    fs::File::open(target)?.set_times(times)
}

#[cfg(unix)]
fn copy_link(source: &Path, target: &Path) -> io::Result<()> {
    let destination = fs::read_link(source)?;
    if target.symlink_metadata().is_ok_and(|m| m.is_file()) {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(destination, target)
}

#[cfg(not(unix))]
fn copy_link(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target).map(|_| ())
}

/// Copy mode, owner and group from `source` onto `target`.
///
/// A symlink target only receives ownership: mode changes would go through
/// the link.
///
/// # Errors
///
/// Returns an error if either side's metadata cannot be read or written.
#[cfg(unix)]
pub fn sync_metadata(source: &Path, target: &Path) -> io::Result<()> {
    use std::os::unix::fs::{MetadataExt as _, PermissionsExt as _};

    if fs::symlink_metadata(target)?.file_type().is_symlink() {
        let meta = fs::symlink_metadata(source)?;
        return std::os::unix::fs::lchown(target, Some(meta.uid()), Some(meta.gid()));
    }

    let meta = fs::metadata(source)?;
    fs::set_permissions(target, fs::Permissions::from_mode(meta.mode()))?;
    std::os::unix::fs::chown(target, Some(meta.uid()), Some(meta.gid()))
}

/// Copy the read-only flag from `source` onto `target`.
///
/// # Errors
///
/// Returns an error if either side's metadata cannot be read or written.
#[cfg(not(unix))]
pub fn sync_metadata(source: &Path, target: &Path) -> io::Result<()> {
    let readonly = fs::metadata(source)?.permissions().readonly();
    let mut perms = fs::metadata(target)?.permissions();
    perms.set_readonly(readonly);
    fs::set_permissions(target, perms)
}
