#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for rule expansion.
//!
//! These tests build real source trees, resolve a rule list against them and
//! check the shape of the resulting action plan: ordering, deduplication,
//! override scoping and the handling of absent sources.

mod common;

use std::collections::HashSet;

use common::TestContextBuilder;
use etcrebase::actions::Strategy;
use etcrebase::commands::rebase;

const MICROOS_RULES: &str = "\
# MicroOS configuration
/etc/hosts
/etc/ssh/;copy
/etc/sysconfig/;copyprefertarget
/etc/passwd
/etc/shadow
/etc/group
/etc/fstab
/etc/missing
";

fn microos_tree() -> TestContextBuilder {
    TestContextBuilder::new()
        .with_source_file("etc/passwd", "root:x:0:0:root:/root:/bin/bash\n")
        .with_source_file("etc/shadow", "root:!:19000::::::\n")
        .with_source_file("etc/group", "root:x:0:\n")
        .with_source_file("etc/fstab", "UUID=1 / btrfs ro 0 0\n")
        .with_source_file("etc/hosts", "127.0.0.1 localhost\n")
        .with_source_file("etc/ssh/sshd_config", "PermitRootLogin no\n")
        .with_source_file("etc/ssh/ssh_config", "Host *\n")
        .with_source_file("etc/sysconfig/proxy", "PROXY_ENABLED=\"no\"\n")
        .with_rules(MICROOS_RULES)
}

// ---------------------------------------------------------------------------
// Snapshot: resolved plan
// ---------------------------------------------------------------------------

/// Snapshot of the full plan for a typical rule list.
///
/// Any change to ordering, ancestor synthesis or strategy binding shows up
/// here as a diff.
#[test]
fn resolved_plan() {
    let ctx = microos_tree().build();
    let actions = ctx.resolve();
    insta::assert_snapshot!("resolved_plan", ctx.render(&actions));
}

// ---------------------------------------------------------------------------
// Structural invariants
// ---------------------------------------------------------------------------

/// Two resolutions of the same inputs are identical.
#[test]
fn resolution_is_deterministic() {
    let ctx = microos_tree().build();
    assert_eq!(ctx.resolve(), ctx.resolve());
}

/// No source path appears twice.
#[test]
fn one_action_per_source() {
    let ctx = microos_tree()
        .with_rules(&format!("{MICROOS_RULES}/etc;copy\n/etc/hosts;copyprefertarget\n"))
        .build();
    let actions = ctx.resolve();
    let mut seen = HashSet::new();
    for action in &actions {
        assert!(
            seen.insert(action.source.clone()),
            "duplicate action for {}",
            action.source.display()
        );
    }
}

/// Every directory action precedes the actions for its contents.
#[test]
fn directories_precede_contents() {
    let ctx = microos_tree().build();
    let actions = ctx.resolve();
    for (index, action) in actions.iter().enumerate() {
        let Some(parent) = action.source.parent() else {
            continue;
        };
        if parent == ctx.source() {
            continue;
        }
        let parent_index = actions
            .iter()
            .position(|a| a.source == parent)
            .expect("parent directory has an action");
        assert!(parent_index < index, "{action} precedes its parent");
        assert_eq!(actions[parent_index].strategy, Strategy::CreateDirectory);
    }
}

/// Every target lies at the same relative location as its source.
#[test]
fn targets_mirror_sources() {
    let ctx = microos_tree().build();
    for action in ctx.resolve() {
        let source_rel = action.source.strip_prefix(ctx.source()).unwrap();
        let target_rel = action.target.strip_prefix(ctx.target()).unwrap();
        assert_eq!(source_rel, target_rel);
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// A narrow rule after a directory rule overrides only its own path.
#[test]
fn narrow_rule_overrides_only_its_path() {
    let ctx = TestContextBuilder::new()
        .with_source_file("dir/a", "a\n")
        .with_source_file("dir/sub/file", "alice:x:1001:1001::/home/alice:/bin/bash\n")
        .with_source_file("dir/sub/other", "o\n")
        .with_rules("dir;copy\ndir/sub/file;mergepasswd\n")
        .build();

    let rendered = ctx.render(&ctx.resolve());
    assert_eq!(
        rendered,
        "\
CreateDirectory: dir -> dir
Copy: dir/a -> dir/a
CreateDirectory: dir/sub -> dir/sub
MergePasswd: dir/sub/file -> dir/sub/file
Copy: dir/sub/other -> dir/sub/other"
    );
}

/// A broad rule listed after a seeded default wins for that path.
#[test]
fn later_broad_rule_overrides_seeded_default() {
    let ctx = TestContextBuilder::new()
        .with_source_file("etc/group", "root:x:0:\n")
        .with_rules("etc;copy\n")
        .build();

    let actions = ctx.resolve();
    let group = actions
        .iter()
        .find(|a| a.source.ends_with("etc/group"))
        .unwrap();
    assert_eq!(group.strategy, Strategy::Copy);
}

/// Re-listing a seeded default after a broad rule restores it.
#[test]
fn relisted_default_after_broad_rule_keeps_merge() {
    let ctx = TestContextBuilder::new()
        .with_source_file("etc/group", "root:x:0:\n")
        .with_rules("etc;copy\netc/group\n")
        .build();

    let actions = ctx.resolve();
    let group = actions
        .iter()
        .find(|a| a.source.ends_with("etc/group"))
        .unwrap();
    assert_eq!(group.strategy, Strategy::MergeGroup);
}

// ---------------------------------------------------------------------------
// Absent sources
// ---------------------------------------------------------------------------

/// Rules and seeded defaults for missing sources produce no actions.
#[test]
fn missing_sources_produce_nothing() {
    let ctx = TestContextBuilder::new()
        .with_rules("etc/missing\netc/also-missing/;copy\n")
        .build();
    assert!(ctx.resolve().is_empty());
}

/// An empty directory rule still creates the directory.
#[test]
fn empty_directory_rule_creates_directory() {
    let ctx = TestContextBuilder::new()
        .with_source_dir("etc/empty.d")
        .with_rules("etc/empty.d;copy\n")
        .build();
    assert_eq!(
        ctx.render(&ctx.resolve()),
        "CreateDirectory: etc -> etc\nCreateDirectory: etc/empty.d -> etc/empty.d"
    );
}

// ---------------------------------------------------------------------------
// Command-level planning
// ---------------------------------------------------------------------------

/// The command's planning step yields the same plan as the library pipeline.
#[test]
fn command_plan_matches_library_resolution() {
    let ctx = microos_tree().build();
    let log = ctx.logger();
    let planned = rebase::plan(&ctx.target(), &ctx.opts(true), &log).unwrap();
    assert_eq!(planned, ctx.resolve());
}
