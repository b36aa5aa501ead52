//! Command-line surface of the `etcrebase` binary.
use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_STRATEGY;

/// Rebase `/etc` configuration from a running system onto a new root tree.
#[derive(Parser, Debug)]
#[command(
    name = "etcrebase",
    about = "Migrate configuration from one root tree into another",
    version = option_env!("ETCREBASE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Root of the tree receiving the configuration (e.g. a new snapshot)
    pub target: PathBuf,

    /// Options of the rebase run itself.
    #[command(flatten)]
    pub opts: RebaseOpts,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options controlling a single rebase run.
#[derive(Parser, Debug, Clone)]
pub struct RebaseOpts {
    /// Root of the tree configuration is read from
    #[arg(short, long, default_value = "/")]
    pub source: PathBuf,

    /// Preview actions without applying them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Rule list file (defaults to $ETCREBASE_RULES, then the packaged list)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Strategy for rules that name none
    #[arg(long, default_value = DEFAULT_STRATEGY)]
    pub default_strategy: String,
}
