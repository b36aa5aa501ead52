// Shared helpers for integration tests.
//
// Provides a pair of temporary root trees (source and target) plus a rule
// list file, and a fluent builder so each integration test can lay out an
// isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use etcrebase::actions::{Action, ActionRegistry};
use etcrebase::cli::RebaseOpts;
use etcrebase::config::rules::parse_rules_from_str;
use etcrebase::logging::Logger;
use etcrebase::resolver::ConfigurationResolver;
use etcrebase::rules::RuleSet;

/// Source tree, target tree and rule list backed by one [`tempfile::TempDir`].
///
/// Everything is deleted when the context is dropped.
pub struct RebaseTestContext {
    /// Temporary directory holding `source/`, `target/`, `configs.txt` and
    /// `rebase.log`.
    pub root: tempfile::TempDir,
}

impl RebaseTestContext {
    /// Create empty source and target trees and an empty rule list.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("source")).expect("create source tree");
        std::fs::create_dir_all(root.path().join("target")).expect("create target tree");
        std::fs::write(root.path().join("configs.txt"), "").expect("write rule list");
        Self { root }
    }

    /// Root of the source tree.
    pub fn source(&self) -> PathBuf {
        self.root.path().join("source")
    }

    /// Root of the target tree.
    pub fn target(&self) -> PathBuf {
        self.root.path().join("target")
    }

    /// Path of the rule list file.
    pub fn rules_file(&self) -> PathBuf {
        self.root.path().join("configs.txt")
    }

    /// Read a file of the target tree.
    pub fn read_target(&self, relative: &str) -> String {
        std::fs::read_to_string(self.target().join(relative)).expect("read target file")
    }

    /// Command options pointing at this context.
    pub fn opts(&self, dry_run: bool) -> RebaseOpts {
        RebaseOpts {
            source: self.source(),
            dry_run,
            rules: Some(self.rules_file()),
            default_strategy: "copy".to_string(),
        }
    }

    /// Logger whose log file lives inside this context, never under `$HOME`.
    pub fn logger(&self) -> Logger {
        Logger::with_log_file(Some(self.root.path().join("rebase.log")))
    }

    /// Build the rule set from the rule list with the builtin registry.
    pub fn rule_set(&self) -> RuleSet {
        let content = std::fs::read_to_string(self.rules_file()).expect("read rule list");
        let list = parse_rules_from_str(&content);
        RuleSet::build(&list.rules, &ActionRegistry::builtin(), "copy").expect("build rule set")
    }

    /// Resolve the rule list against the two trees.
    pub fn resolve(&self) -> Vec<Action> {
        let rules = self.rule_set();
        ConfigurationResolver::new(&rules, self.source(), self.target())
            .resolve()
            .expect("resolve actions")
    }

    /// Apply every applicable action, stopping at the first failure.
    pub fn apply_all(&self) {
        for action in self.resolve() {
            if action.applicable() {
                action.apply().expect("apply action");
            }
        }
    }

    /// Render actions as `Kind: source -> target` with tree-relative paths.
    pub fn render(&self, actions: &[Action]) -> String {
        let source = self.source();
        let target = self.target();
        actions
            .iter()
            .map(|a| {
                format!(
                    "{}: {} -> {}",
                    a.strategy.kind_name(),
                    relative(&a.source, &source),
                    relative(&a.target, &target)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .expect("path inside tree")
        .display()
        .to_string()
}

/// Fluent builder for [`RebaseTestContext`].
pub struct TestContextBuilder {
    ctx: RebaseTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with empty trees.
    pub fn new() -> Self {
        Self {
            ctx: RebaseTestContext::new(),
        }
    }

    /// Write `content` to `relative` in the source tree, creating parents.
    pub fn with_source_file(self, relative: &str, content: &str) -> Self {
        write(&self.ctx.source().join(relative), content);
        self
    }

    /// Write `content` to `relative` in the target tree, creating parents.
    pub fn with_target_file(self, relative: &str, content: &str) -> Self {
        write(&self.ctx.target().join(relative), content);
        self
    }

    /// Create an empty directory in the source tree.
    pub fn with_source_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.ctx.source().join(relative)).expect("create source dir");
        self
    }

    /// Replace the rule list.
    pub fn with_rules(self, content: &str) -> Self {
        std::fs::write(self.ctx.rules_file(), content).expect("write rule list");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> RebaseTestContext {
        self.ctx
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
