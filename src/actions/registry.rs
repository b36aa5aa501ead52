//! Name → strategy registry and the well-known default bindings.
use std::collections::HashMap;

use super::Strategy;
use crate::error::RuleError;

/// One row of the built-in strategy table.
#[derive(Debug)]
struct StrategySpec {
    name: &'static str,
    strategy: Strategy,
    default_paths: &'static [&'static str],
}

/// Strategies available to rule lists, in registration order.
const BUILTIN_STRATEGIES: &[StrategySpec] = &[
    StrategySpec {
        name: "copy",
        strategy: Strategy::Copy,
        default_paths: &[],
    },
    StrategySpec {
        name: "copyprefertarget",
        strategy: Strategy::CopyIfAbsent,
        default_paths: &[],
    },
    StrategySpec {
        name: "mergepasswd",
        strategy: Strategy::MergePasswd,
        default_paths: &["etc/passwd"],
    },
    StrategySpec {
        name: "mergeshadow",
        strategy: Strategy::MergeShadow,
        default_paths: &["etc/shadow"],
    },
    StrategySpec {
        name: "mergegroup",
        strategy: Strategy::MergeGroup,
        default_paths: &["etc/group"],
    },
    StrategySpec {
        name: "microosfstab",
        strategy: Strategy::RewriteFstab,
        default_paths: &["etc/fstab"],
    },
];

/// Maps strategy names to strategies and well-known paths to their default.
///
/// Built once at startup and passed by reference to rule-set construction.
///
/// # Examples
///
/// ```
/// use etcrebase::actions::{ActionRegistry, Strategy};
///
/// let registry = ActionRegistry::builtin();
/// assert_eq!(registry.lookup("mergeshadow").unwrap(), Strategy::MergeShadow);
/// assert!(registry.lookup("diff").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    strategies: HashMap<String, Strategy>,
    defaults: Vec<(String, Strategy)>,
}

impl ActionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in strategy registered.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for builtin in BUILTIN_STRATEGIES {
            registry.register(builtin.name, builtin.strategy, builtin.default_paths);
        }
        registry
    }

    /// Register `strategy` under `name` and as the default for each of
    /// `default_paths`. Re-registering a name or path replaces the old entry.
    pub fn register(&mut self, name: &str, strategy: Strategy, default_paths: &[&str]) {
        self.strategies.insert(name.to_string(), strategy);
        for path in default_paths {
            match self.defaults.iter_mut().find(|(p, _)| p.as_str() == *path) {
                Some(slot) => slot.1 = strategy,
                None => self.defaults.push(((*path).to_string(), strategy)),
            }
        }
    }

    /// Resolve a strategy name.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownStrategy`] if `name` was never registered.
    pub fn lookup(&self, name: &str) -> Result<Strategy, RuleError> {
        self.strategies
            .get(name)
            .copied()
            .ok_or_else(|| RuleError::UnknownStrategy {
                name: name.to_string(),
            })
    }

    /// Default path bindings, in registration order.
    pub fn default_bindings(&self) -> impl Iterator<Item = (&str, Strategy)> {
        self.defaults.iter().map(|(path, s)| (path.as_str(), *s))
    }

    /// Registered strategy names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registers_all_names() {
        let registry = ActionRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "copy",
                "copyprefertarget",
                "mergegroup",
                "mergepasswd",
                "mergeshadow",
                "microosfstab"
            ]
        );
    }

    #[test]
    fn builtin_default_bindings_in_registration_order() {
        let registry = ActionRegistry::builtin();
        let bindings: Vec<(&str, Strategy)> = registry.default_bindings().collect();
        assert_eq!(
            bindings,
            vec![
                ("etc/passwd", Strategy::MergePasswd),
                ("etc/shadow", Strategy::MergeShadow),
                ("etc/group", Strategy::MergeGroup),
                ("etc/fstab", Strategy::RewriteFstab),
            ]
        );
    }

    #[test]
    fn lookup_unknown_name_fails() {
        let registry = ActionRegistry::builtin();
        let err = registry.lookup("mergepaswd").unwrap_err();
        assert!(matches!(err, RuleError::UnknownStrategy { name } if name == "mergepaswd"));
    }

    #[test]
    fn register_replaces_existing_name_and_default() {
        let mut registry = ActionRegistry::builtin();
        registry.register("mergepasswd", Strategy::Copy, &["etc/passwd"]);
        assert_eq!(registry.lookup("mergepasswd").unwrap(), Strategy::Copy);
        let passwd: Vec<Strategy> = registry
            .default_bindings()
            .filter(|(path, _)| *path == "etc/passwd")
            .map(|(_, s)| s)
            .collect();
        assert_eq!(passwd, vec![Strategy::Copy]);
    }

    #[test]
    fn empty_registry_has_no_defaults() {
        let registry = ActionRegistry::new();
        assert_eq!(registry.default_bindings().count(), 0);
        assert!(registry.lookup("copy").is_err());
    }
}
