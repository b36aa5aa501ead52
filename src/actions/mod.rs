//! Concrete actions: one source path, one target path, one strategy.
//!
//! Every action follows the same `applicable → run → sync_permissions`
//! contract. The strategy set is closed, so dispatch is a `match` on
//! [`Strategy`] rather than a trait object.
pub mod error;
pub mod fs;
pub mod fstab;
pub mod merge;
pub mod registry;

use std::fmt;
use std::path::PathBuf;

pub use error::ActionError;
pub use registry::ActionRegistry;

/// How a single file or directory is reconciled into the target tree.
///
/// # Examples
///
/// ```
/// use etcrebase::actions::Strategy;
///
/// assert_eq!(Strategy::MergePasswd.kind_name(), "MergePasswd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Create the target directory (and parents) when absent.
    CreateDirectory,
    /// Byte-for-byte copy of the source.
    Copy,
    /// Copy, but only when the target does not exist yet.
    CopyIfAbsent,
    /// Append regular users (UID >= 1000) to the target passwd.
    MergePasswd,
    /// Merge shadow entries that carry a password, deduplicated by user.
    MergeShadow,
    /// Merge regular or populated groups, deduplicated by group name.
    MergeGroup,
    /// Copy fstab, replacing the `/etc` overlay line for the target snapshot.
    RewriteFstab,
}

impl Strategy {
    /// Name used when displaying an action of this kind.
    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::CreateDirectory => "CreateDirectory",
            Self::Copy => "Copy",
            Self::CopyIfAbsent => "CopyIfAbsent",
            Self::MergePasswd => "MergePasswd",
            Self::MergeShadow => "MergeShadow",
            Self::MergeGroup => "MergeGroup",
            Self::RewriteFstab => "RewriteFstab",
        }
    }
}

/// A single executable action.
///
/// Identity is the source path: the resolver keeps at most one action per
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Absolute path in the source tree.
    pub source: PathBuf,
    /// Absolute path in the target tree.
    pub target: PathBuf,
    /// Bound strategy.
    pub strategy: Strategy,
}

impl Action {
    /// Create a new action.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, strategy: Strategy) -> Self {
        Self {
            source,
            target,
            strategy,
        }
    }

    /// Whether the action can run against the current target.
    #[must_use]
    pub fn applicable(&self) -> bool {
        match self.strategy {
            Strategy::CopyIfAbsent => !self.target.exists(),
            _ => true,
        }
    }

    /// Run the strategy body without touching metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::ExecutionFailed`] on any I/O failure.
    pub fn run(&self) -> Result<(), ActionError> {
        let result = match self.strategy {
            Strategy::CreateDirectory => fs::ensure_dir(&self.target),
            Strategy::Copy | Strategy::CopyIfAbsent => fs::copy_entry(&self.source, &self.target),
            Strategy::MergePasswd => merge::merge_passwd(&self.source, &self.target),
            Strategy::MergeShadow => merge::merge_shadow(&self.source, &self.target),
            Strategy::MergeGroup => merge::merge_group(&self.source, &self.target),
            Strategy::RewriteFstab => fstab::rewrite(&self.source, &self.target),
        };
        result.map_err(|source| ActionError::ExecutionFailed {
            action: self.to_string(),
            source,
        })
    }

    /// Run the action, then copy mode and ownership from source to target.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of [`run`](Self::run) or
    /// [`sync_permissions`](Self::sync_permissions).
    pub fn apply(&self) -> Result<(), ActionError> {
        tracing::debug!("applying {self}");
        self.run()?;
        self.sync_permissions()
    }

    /// Copy mode, owner and group from the source onto the target.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::TargetMissing`] if the target is absent and
    /// [`ActionError::PermissionSyncFailed`] if metadata cannot be read or
    /// written.
    pub fn sync_permissions(&self) -> Result<(), ActionError> {
        if self.target.symlink_metadata().is_err() {
            return Err(ActionError::TargetMissing {
                path: self.target.clone(),
            });
        }
        fs::sync_metadata(&self.source, &self.target).map_err(|source| {
            ActionError::PermissionSyncFailed {
                path: self.target.clone(),
                source,
            }
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}: {} -> {}>",
            self.strategy.kind_name(),
            self.source.display(),
            self.target.display()
        )
    }
}
