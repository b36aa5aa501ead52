//! Typed error variants for action execution.
//!
//! [`ActionError`] is returned by [`Action::run`](super::Action::run),
//! [`Action::sync_permissions`](super::Action::sync_permissions) and
//! [`Action::apply`](super::Action::apply). Every variant is fatal for the
//! action that produced it; the driver decides whether the run continues.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while applying a single action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action body failed with an I/O error.
    #[error("{action} failed: {source}")]
    ExecutionFailed {
        /// Display form of the failing action.
        action: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Mode or ownership could not be copied onto the target.
    #[error("failed to sync permissions of {path}: {source}")]
    PermissionSyncFailed {
        /// Target whose metadata could not be updated.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The target did not exist after the action body ran.
    #[error("target missing after apply: {path}")]
    TargetMissing {
        /// Expected target path.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn execution_failed_display() {
        let e = ActionError::ExecutionFailed {
            action: "<Copy: /etc/hosts -> /mnt/etc/hosts>".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().starts_with("<Copy: /etc/hosts"));
        assert!(e.to_string().ends_with("failed: denied"));
    }

    #[test]
    fn permission_sync_failed_display() {
        let e = ActionError::PermissionSyncFailed {
            path: PathBuf::from("/mnt/etc/shadow"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/mnt/etc/shadow"));
    }

    #[test]
    fn target_missing_display() {
        let e = ActionError::TargetMissing {
            path: PathBuf::from("/mnt/etc/group"),
        };
        assert_eq!(e.to_string(), "target missing after apply: /mnt/etc/group");
    }
}
