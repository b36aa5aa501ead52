//! Rule-list configuration: where the list lives and how it is parsed.
pub mod rules;

use std::path::{Path, PathBuf};

/// Rule list shipped with the distribution.
pub const DEFAULT_RULES_FILE: &str = "/usr/share/etcrebase/configs-microos.txt";

/// Environment variable that overrides the packaged rule list.
pub const RULES_ENV: &str = "ETCREBASE_RULES";

/// Strategy used for rules that name none and have no seeded default.
pub const DEFAULT_STRATEGY: &str = "copy";

/// Resolve the rule list path: explicit flag, then `ETCREBASE_RULES`, then
/// the packaged default.
#[must_use]
pub fn resolve_rules_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(RULES_ENV)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_RULES_FILE)
}
