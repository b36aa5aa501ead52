//! Domain-specific error types for the rebase engine.
//!
//! Internal modules return typed errors built with [`thiserror`]; the
//! command layer converts them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! RebaseError
//! ├── Rule(RuleError)      : rule list loading, strategy lookup
//! ├── Resolve(ResolveError): tree traversal while expanding rules
//! └── Action(ActionError)  : copy, merge, rewrite, permission sync
//! ```
//!
//! [`Warning`] collects the recoverable anomalies. They are never returned
//! as `Err`; callers log them and carry on.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::actions::error::ActionError;

/// Top-level error type for a rebase run.
#[derive(Error, Debug)]
pub enum RebaseError {
    /// The rule list could not be turned into a rule set.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// The source tree could not be expanded into actions.
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// An individual action failed.
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Errors that arise while building a rule set.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A rule or the run default names a strategy that was never registered.
    #[error("unknown strategy '{name}'")]
    UnknownStrategy {
        /// The name that failed to resolve.
        name: String,
    },

    /// The rule list file could not be read.
    #[error("IO error reading rule list {path}: {source}")]
    Io {
        /// Path to the rule list.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while expanding rules against the source tree.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Walking a directory rule failed part way.
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// Root of the directory rule being walked.
        path: PathBuf,
        /// Underlying traversal error.
        source: walkdir::Error,
    },
}

/// Recoverable anomalies. Logged, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line of a passwd/shadow/group database did not parse.
    #[error("{database}: skipping unparseable line '{line}'")]
    MergeParse {
        /// Database being merged (`passwd`, `shadow`, `group`).
        database: &'static str,
        /// The offending line, without its newline.
        line: String,
    },

    /// The fstab rewrite could not infer a snapshot number.
    #[error("unable to detect snapshot number from {target}, using {fallback}")]
    SnapshotNumberUnparseable {
        /// Target path that was inspected.
        target: PathBuf,
        /// Snapshot number used instead.
        fallback: u32,
    },

    /// A narrower rule is evaluated before a broader rule that encloses it,
    /// so the broader rule will override it.
    #[error("rule '{narrow}' comes before enclosing rule '{broad}' and will be overridden by it")]
    RuleOrdering {
        /// The more specific rule path.
        narrow: String,
        /// The enclosing rule path.
        broad: String,
    },

    /// A rule-list line was skipped because its path is unusable.
    #[error("skipping malformed rule '{line}': {reason}")]
    MalformedRule {
        /// The raw line.
        line: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
