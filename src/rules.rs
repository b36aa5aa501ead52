//! The resolved path → strategy table for one run.
//!
//! Built once from the registry's default bindings overlaid by a rule list,
//! then read-only. Iteration order is the order in which rules are expanded,
//! so a later rule overrides an earlier one for every source path both touch.
use std::path::Path;

use crate::actions::{ActionRegistry, Strategy};
use crate::config::rules::RawRule;
use crate::error::{RuleError, Warning};

/// A tree-relative path bound to a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Path relative to the tree root, without leading separator.
    pub path: String,
    /// Strategy applied to the path (recursively for directories).
    pub strategy: Strategy,
}

/// Ordered, deduplicated rule table.
///
/// # Examples
///
/// ```
/// use etcrebase::actions::{ActionRegistry, Strategy};
/// use etcrebase::config::rules::parse_rules_from_str;
/// use etcrebase::rules::RuleSet;
///
/// let registry = ActionRegistry::builtin();
/// let list = parse_rules_from_str("etc/passwd\netc/hosts\n");
/// let rules = RuleSet::build(&list.rules, &registry, "copy").unwrap();
///
/// assert_eq!(rules.get("etc/passwd"), Some(Strategy::MergePasswd));
/// assert_eq!(rules.get("etc/hosts"), Some(Strategy::Copy));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build the rule set.
    ///
    /// Seeds the table with the registry's default bindings, then applies
    /// `raw` in order:
    /// - a named strategy replaces any binding for the exact path;
    /// - an unnamed rule keeps a seeded binding, else uses `default_strategy`.
    ///
    /// Every rule from `raw` is moved to its own position in the order, so
    /// the rule list alone decides which rule overrides which. A path listed
    /// again therefore moves to the position of its last line, and a seeded
    /// default that the list mentions leaves its seeded slot; neither keeps
    /// the place of its first insertion.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownStrategy`] if a rule or `default_strategy`
    /// names an unregistered strategy.
    pub fn build(
        raw: &[RawRule],
        registry: &ActionRegistry,
        default_strategy: &str,
    ) -> Result<Self, RuleError> {
        let fallback = registry.lookup(default_strategy)?;
        let mut rules: Vec<Rule> = registry
            .default_bindings()
            .map(|(path, strategy)| Rule {
                path: path.to_string(),
                strategy,
            })
            .collect();

        for entry in raw {
            let position = rules.iter().position(|r| r.path == entry.path);
            let previous = position.map(|index| rules.remove(index));
            let strategy = match (&entry.strategy, previous) {
                (Some(name), _) => registry.lookup(name)?,
                (None, Some(seeded)) => seeded.strategy,
                (None, None) => fallback,
            };
            rules.push(Rule {
                path: entry.path.clone(),
                strategy,
            });
        }

        Ok(Self { rules })
    }

    /// Rules in expansion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Strategy bound to exactly `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Strategy> {
        self.rules
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.strategy)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Report every narrower rule that is expanded before a broader rule
    /// enclosing it. The broader rule wins for that path, which is rarely
    /// what the rule list meant.
    #[must_use]
    pub fn ordering_warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for (index, narrow) in self.rules.iter().enumerate() {
            for broad in self.rules.iter().skip(index + 1) {
                if narrow.path != broad.path && Path::new(&narrow.path).starts_with(&broad.path) {
                    warnings.push(Warning::RuleOrdering {
                        narrow: narrow.path.clone(),
                        broad: broad.path.clone(),
                    });
                }
            }
        }
        warnings
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
