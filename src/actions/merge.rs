//! Merging of the user and group databases (`passwd`, `shadow`, `group`).
//!
//! Selection and merging are pure functions over text so they can be tested
//! without touching the filesystem; the `merge_*` wrappers do the I/O and log
//! the parse warnings collected along the way.
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Warning;

/// First UID/GID handed out to regular (non-system) accounts.
pub const FIRST_REGULAR_ID: u32 = 1000;

/// Lines picked from a source database plus the anomalies met on the way.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Qualifying lines, without line terminators, in source order.
    pub lines: Vec<&'a str>,
    /// Lines that could not be parsed and were skipped.
    pub warnings: Vec<Warning>,
}

impl Selection<'_> {
    fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
    }
}

/// Pick passwd entries for regular users (UID >= 1000).
///
/// Lines without a `:` are ignored; lines whose UID field is missing or not a
/// number are reported as [`Warning::MergeParse`].
///
/// # Examples
///
/// ```
/// use etcrebase::actions::merge::select_passwd;
///
/// let source = "root:x:0:0::/root:/bin/bash\nalice:x:1001:1001::/home/alice:/bin/bash\n";
/// let selection = select_passwd(source);
/// assert_eq!(selection.lines, vec!["alice:x:1001:1001::/home/alice:/bin/bash"]);
/// ```
#[must_use]
pub fn select_passwd(source: &str) -> Selection<'_> {
    let mut selection = Selection::default();
    for line in source.lines().filter(|l| l.contains(':')) {
        match line.split(':').nth(2).and_then(parse_id) {
            Some(uid) if uid >= FIRST_REGULAR_ID => selection.lines.push(line),
            Some(_) => {}
            None => selection.warnings.push(Warning::MergeParse {
                database: "passwd",
                line: line.to_string(),
            }),
        }
    }
    selection
}

/// Pick shadow entries whose password field is non-empty.
#[must_use]
pub fn select_shadow(source: &str) -> Selection<'_> {
    let lines = source
        .lines()
        .filter(|line| line.split(':').nth(1).is_some_and(|hash| !hash.is_empty()))
        .collect();
    Selection {
        lines,
        warnings: Vec::new(),
    }
}

/// Pick group entries with GID >= 1000 or a non-empty member list.
///
/// Blank lines are ignored. Lines that do not split into exactly four fields,
/// or whose GID is not a number, are reported as [`Warning::MergeParse`].
#[must_use]
pub fn select_group(source: &str) -> Selection<'_> {
    let mut selection = Selection::default();
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.trim().split(':').collect();
        let parsed = match fields.as_slice() {
            [_, _, gid, members] => parse_id(gid).map(|gid| (gid, members.is_empty())),
            _ => None,
        };
        match parsed {
            Some((gid, no_members)) => {
                if gid >= FIRST_REGULAR_ID || !no_members {
                    selection.lines.push(line);
                }
            }
            None => selection.warnings.push(Warning::MergeParse {
                database: "group",
                line: line.to_string(),
            }),
        }
    }
    selection
}

/// Merge `preferred` lines in front of `existing` ones, keeping only the first
/// line seen for each name (the first colon-separated field).
///
/// Lines without a `:` are dropped.
///
/// # Examples
///
/// ```
/// use etcrebase::actions::merge::merge_by_name;
///
/// let merged = merge_by_name(["alice:$6$new:19000::::::"], ["root:*:19000::::::", "alice:!:1::::::"]);
/// assert_eq!(merged, vec!["alice:$6$new:19000::::::", "root:*:19000::::::"]);
/// ```
#[must_use]
pub fn merge_by_name<'a>(
    preferred: impl IntoIterator<Item = &'a str>,
    existing: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    preferred
        .into_iter()
        .chain(existing)
        .filter(|line| line.contains(':'))
        .filter(|line| seen.insert(line.split(':').next().unwrap_or_default()))
        .collect()
}

/// Append the regular users of `source` to `target`.
///
/// A symlinked target is read through, then replaced by a regular file.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the target written.
pub fn merge_passwd(source: &Path, target: &Path) -> io::Result<()> {
    let content = fs::read_to_string(source)?;
    let selection = select_passwd(&content);
    selection.log_warnings();

    let mut merged = read_existing(target)?;
    if !merged.is_empty() && !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(&render(&selection.lines));
    super::fs::remove_existing_link(target)?;
    fs::write(target, merged)
}

/// Merge the password-bearing entries of `source` into `target`.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the target written.
pub fn merge_shadow(source: &Path, target: &Path) -> io::Result<()> {
    rewrite_merged(source, target, select_shadow)
}

/// Merge the regular and populated groups of `source` into `target`.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the target written.
pub fn merge_group(source: &Path, target: &Path) -> io::Result<()> {
    rewrite_merged(source, target, select_group)
}

fn rewrite_merged(
    source: &Path,
    target: &Path,
    select: for<'a> fn(&'a str) -> Selection<'a>,
) -> io::Result<()> {
    let content = fs::read_to_string(source)?;
    let selection = select(&content);
    selection.log_warnings();

    let existing = read_existing(target)?;
    let merged = merge_by_name(selection.lines.iter().copied(), existing.lines());
    super::fs::remove_existing_link(target)?;
    fs::write(target, render(&merged))
}

/// Read `path`, treating an absent file as empty.
fn read_existing(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        other => other,
    }
}

fn render(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn parse_id(field: &str) -> Option<u32> {
    field.trim().parse().ok()
}
