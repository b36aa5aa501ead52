//! Configuration rebase engine.
//!
//! Migrates `/etc` configuration from a source root tree (usually the
//! running system) into a target root tree (usually a freshly created
//! snapshot). A rule list maps tree-relative paths to named strategies;
//! the rules are expanded against the source tree into one ordered action
//! per file or directory, and each action reconciles its target.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: locate and parse the rule list
//! - **[`rules`]**: the deduplicated path → strategy table
//! - **[`resolver`]**: expansion of the table into ordered [`actions::Action`]s
//! - **[`actions`]**: copy, merge and rewrite primitives plus the strategy registry
//! - **[`commands`]**: top-level orchestration of a run
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod rules;
