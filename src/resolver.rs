//! Expansion of a [`RuleSet`] into one concrete [`Action`] per source path.
//!
//! Rules are expanded in rule-set order into a map keyed by the absolute
//! source path. A later rule that reaches the same path replaces the earlier
//! action, which is how a narrow rule overrides the directory rule around
//! it. Every ancestor between the tree root and a rule's path gets a
//! [`Strategy::CreateDirectory`] action, and the map is emitted in bytewise
//! path order so a directory always precedes its contents.
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::actions::{Action, Strategy};
use crate::error::ResolveError;
use crate::rules::{Rule, RuleSet};

type Expanded = BTreeMap<OsString, Action>;

/// Turns a rule set into an ordered, deduplicated action list for a pair of
/// tree roots.
#[derive(Debug)]
pub struct ConfigurationResolver<'a> {
    rules: &'a RuleSet,
    source_root: PathBuf,
    target_root: PathBuf,
}

impl<'a> ConfigurationResolver<'a> {
    /// Create a resolver mapping `source_root` onto `target_root`.
    #[must_use]
    pub fn new(
        rules: &'a RuleSet,
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rules,
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    /// Expand every rule and return the actions sorted by source path.
    ///
    /// Rules whose source path does not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Walk`] if a directory rule cannot be traversed.
    pub fn resolve(&self) -> Result<Vec<Action>, ResolveError> {
        let mut expanded = Expanded::new();
        for rule in self.rules {
            self.expand_rule(rule, &mut expanded)?;
        }
        Ok(expanded.into_values().collect())
    }

    fn expand_rule(&self, rule: &Rule, expanded: &mut Expanded) -> Result<(), ResolveError> {
        let source_full = self.source_root.join(&rule.path);
        let target_full = self.target_root.join(&rule.path);

        let Ok(metadata) = source_full.symlink_metadata() else {
            tracing::debug!(
                "skipping rule {}: {} does not exist",
                rule.path,
                source_full.display()
            );
            return Ok(());
        };

        self.add_ancestors(&source_full, expanded);

        if metadata.is_dir() {
            expand_directory(rule, &source_full, &target_full, expanded)
        } else {
            insert(expanded, Action::new(source_full, target_full, rule.strategy));
            Ok(())
        }
    }

    /// Add a `CreateDirectory` action for every proper ancestor of `source`
    /// below the source root that has no action yet.
    fn add_ancestors(&self, source: &Path, expanded: &mut Expanded) {
        for ancestor in source.ancestors().skip(1) {
            let Ok(relative) = ancestor.strip_prefix(&self.source_root) else {
                break;
            };
            if relative.as_os_str().is_empty() {
                break;
            }
            expanded
                .entry(ancestor.as_os_str().to_os_string())
                .or_insert_with(|| {
                    Action::new(
                        ancestor.to_path_buf(),
                        rebase(&self.target_root, relative),
                        Strategy::CreateDirectory,
                    )
                });
        }
    }
}

/// Walk a directory rule. Directories (the rule's own included) become
/// `CreateDirectory`; files and symlinks take the rule's strategy.
fn expand_directory(
    rule: &Rule,
    source_full: &Path,
    target_full: &Path,
    expanded: &mut Expanded,
) -> Result<(), ResolveError> {
    for entry in WalkDir::new(source_full).follow_links(false) {
        let entry = entry.map_err(|source| ResolveError::Walk {
            path: source_full.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(source_full) else {
            continue;
        };

        let file_type = entry.file_type();
        let strategy = if file_type.is_dir() {
            Strategy::CreateDirectory
        } else if file_type.is_file() || file_type.is_symlink() {
            rule.strategy
        } else {
            tracing::debug!("skipping special file {}", entry.path().display());
            continue;
        };

        insert(
            expanded,
            Action::new(
                entry.path().to_path_buf(),
                rebase(target_full, relative),
                strategy,
            ),
        );
    }
    Ok(())
}

/// Join `relative` onto `root` without adding a trailing separator for an
/// empty relative path.
fn rebase(root: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

fn insert(expanded: &mut Expanded, action: Action) {
    expanded.insert(action.source.as_os_str().to_os_string(), action);
}
