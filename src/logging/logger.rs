//! Run logger: console/file messages plus the per-action outcome ledger.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::subscriber::{ACTION_TARGET, DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{ActionEntry, ActionStatus};
use super::utils::log_file_path;

/// Run logger with dry-run awareness and an action ledger for the summary.
///
/// Messages go through [`tracing`]; where they end up is decided by the
/// subscriber installed with [`init_subscriber`](super::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<ActionEntry>>,
    log_file: Option<PathBuf>,
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Logger for `command`, using the default log file location under the
    /// user's cache directory.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Logger reporting `log_file` as the run's log.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Path of the run's log file, if any.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose, always in the file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a planned action.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an action outcome for the summary.
    ///
    /// Failures are logged as errors; applied and skipped actions at debug
    /// level. Dry-run entries are only recorded, the plan line having been
    /// printed by [`dry_run`](Self::dry_run).
    pub fn record(&self, name: &str, status: ActionStatus, message: Option<&str>) {
        let label = status.label();
        match (status, message) {
            (ActionStatus::Failed, Some(msg)) => {
                tracing::error!(target: ACTION_TARGET, status = label, "{name}: {msg}");
            }
            (ActionStatus::Failed, None) => {
                tracing::error!(target: ACTION_TARGET, status = label, "{name}");
            }
            (ActionStatus::Applied | ActionStatus::NotApplicable, _) => {
                tracing::debug!(target: ACTION_TARGET, status = label, "{name}");
            }
            (ActionStatus::DryRun, _) => {}
        }
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(ActionEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return `true` if any recorded action has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Count the number of failed actions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(ActionStatus::Failed)
    }

    fn count(&self, status: ActionStatus) -> usize {
        self.entries
            .lock()
            .map_or(0, |guard| guard.iter().filter(|e| e.status == status).count())
    }

    /// Print the run summary: every failed action, then per-status counts.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        for entry in entries.iter().filter(|e| e.status == ActionStatus::Failed) {
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("failed: {}{suffix}", entry.name));
        }

        let counts: Vec<String> = [
            ActionStatus::Applied,
            ActionStatus::NotApplicable,
            ActionStatus::DryRun,
            ActionStatus::Failed,
        ]
        .into_iter()
        .map(|status| format!("{} {}", self.count(status), status.label()))
        .collect();
        self.info(&format!("{} actions: {}", entries.len(), counts.join(", ")));

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}
