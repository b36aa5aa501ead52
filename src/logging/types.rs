//! Per-action records collected for the run summary.

/// Outcome of one resolved action.
#[derive(Debug, Clone)]
pub struct ActionEntry {
    /// Display form of the action (`<Kind: source -> target>`).
    pub name: String,
    /// Final status of the action.
    pub status: ActionStatus,
    /// Optional detail message (e.g., the error that made it fail).
    pub message: Option<String>,
}

/// Status of a processed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The action ran and its metadata was synced.
    Applied,
    /// The action did not apply to the current target and was skipped.
    NotApplicable,
    /// The action was only printed.
    DryRun,
    /// The action failed.
    Failed,
}

impl ActionStatus {
    /// Short tag used in log lines and the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::NotApplicable => "n/a",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}
