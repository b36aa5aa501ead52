//! Rule-list file parsing.
//!
//! One rule per line: `relative/path[;strategy-name]`. A single leading `/`
//! is stripped and the rest is normalised (`.` components and repeated or
//! trailing separators dropped), so equal paths always compare equal. Blank
//! and `#` lines are ignored.
use std::path::{Component, Path};

use crate::error::{RuleError, Warning};

/// A parsed but not yet resolved rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRule {
    /// Tree-relative path, without leading or trailing separators.
    pub path: String,
    /// Explicit strategy name, if the line had a non-empty one.
    pub strategy: Option<String>,
}

/// Every rule of a rule list, in file order, plus skipped lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    /// Rules in file order.
    pub rules: Vec<RawRule>,
    /// Lines that were rejected.
    pub warnings: Vec<Warning>,
}

/// Load a rule list from `path`.
///
/// # Errors
///
/// Returns [`RuleError::Io`] if the file cannot be read.
pub fn load(path: &Path) -> Result<RuleList, RuleError> {
    let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_rules_from_str(&content))
}

/// Parse rule-list text.
///
/// # Examples
///
/// ```
/// use etcrebase::config::rules::parse_rules_from_str;
///
/// let list = parse_rules_from_str("/etc/ssh/;copy\n\netc/passwd\n");
/// assert_eq!(list.rules.len(), 2);
/// assert_eq!(list.rules[0].path, "etc/ssh");
/// assert_eq!(list.rules[0].strategy.as_deref(), Some("copy"));
/// assert_eq!(list.rules[1].strategy, None);
/// ```
#[must_use]
pub fn parse_rules_from_str(content: &str) -> RuleList {
    let mut list = RuleList::default();
    for line in content.lines() {
        match parse_line(line) {
            Some(Ok(rule)) => list.rules.push(rule),
            Some(Err(warning)) => list.warnings.push(warning),
            None => {}
        }
    }
    list
}

fn parse_line(line: &str) -> Option<Result<RawRule, Warning>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (raw_path, strategy) = match trimmed.split_once(';') {
        Some((path, name)) => (path.trim(), Some(name.trim())),
        None => (trimmed, None),
    };
    let path = raw_path.strip_prefix('/').unwrap_or(raw_path);

    let malformed = |reason| {
        Some(Err(Warning::MalformedRule {
            line: trimmed.to_string(),
            reason,
        }))
    };
    if path.starts_with('/') {
        return malformed("path is not relative to the tree root");
    }
    let Some(path) = normalize(path) else {
        return malformed("path escapes the tree root");
    };
    if path.is_empty() {
        return malformed("empty path");
    }

    Some(Ok(RawRule {
        path,
        strategy: strategy
            .filter(|name| !name.is_empty())
            .map(str::to_string),
    }))
}

/// Rebuild a relative path from its normal components, dropping `.` and
/// repeated or trailing separators. `None` if a `..` component is present.
fn normalize(path: &str) -> Option<String> {
    let mut parts = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}
