//! The `rebase` command: load rules, resolve actions, apply or plan them.
use std::path::Path;

use anyhow::Result;

use crate::actions::{Action, ActionRegistry};
use crate::cli::RebaseOpts;
use crate::config::{self, rules};
use crate::error::RebaseError;
use crate::logging::{ActionStatus, Logger};
use crate::resolver::ConfigurationResolver;
use crate::rules::RuleSet;

/// Run the rebase command.
///
/// # Errors
///
/// Returns an error if the rule list cannot be loaded, a strategy name is
/// unknown, the source tree cannot be walked, or any action failed.
pub fn run(target: &Path, opts: &RebaseOpts, log: &Logger) -> Result<()> {
    let version = option_env!("ETCREBASE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("etcrebase {version}"));
    log.info(&format!("{} -> {}", opts.source.display(), target.display()));

    let actions = plan(target, opts, log)?;

    if opts.dry_run {
        log.stage("Planned actions");
    } else {
        log.stage("Applying actions");
    }
    for action in &actions {
        execute(action, opts.dry_run, log);
    }

    log.print_summary();

    if log.has_failures() {
        anyhow::bail!("{} action(s) failed", log.failure_count());
    }
    Ok(())
}

/// Load the rule set and expand it into the ordered action list.
///
/// # Errors
///
/// Returns [`RebaseError::Rule`] for an unreadable rule list or unknown
/// strategy, and [`RebaseError::Resolve`] if the source tree cannot be walked.
pub fn plan(target: &Path, opts: &RebaseOpts, log: &Logger) -> Result<Vec<Action>, RebaseError> {
    let registry = ActionRegistry::builtin();

    log.stage("Loading rules");
    let rules = load_rules(opts, &registry, log)?;
    log.info(&format!("loaded {} rules", rules.len()));

    log.stage("Resolving actions");
    let actions = ConfigurationResolver::new(&rules, &opts.source, target).resolve()?;
    log.info(&format!("resolved {} actions", actions.len()));
    Ok(actions)
}

fn load_rules(
    opts: &RebaseOpts,
    registry: &ActionRegistry,
    log: &Logger,
) -> Result<RuleSet, RebaseError> {
    let path = config::resolve_rules_path(opts.rules.as_deref());
    log.debug(&format!("rule list: {}", path.display()));
    log.debug(&format!("strategies: {}", registry.names().join(", ")));

    let list = rules::load(&path)?;
    for warning in &list.warnings {
        log.warn(&warning.to_string());
    }

    let rules = RuleSet::build(&list.rules, registry, &opts.default_strategy)?;
    for warning in rules.ordering_warnings() {
        log.warn(&warning.to_string());
    }
    Ok(rules)
}

/// Process one action and record its outcome. Failures are recorded, never
/// propagated, so the remaining actions still run. A dry run prints every
/// action, marking the ones that would be skipped.
fn execute(action: &Action, dry_run: bool, log: &Logger) {
    let name = action.to_string();

    if !action.applicable() {
        if dry_run {
            log.dry_run(&format!("{name} (not applicable)"));
        }
        log.record(&name, ActionStatus::NotApplicable, None);
        return;
    }

    if dry_run {
        log.dry_run(&name);
        log.record(&name, ActionStatus::DryRun, None);
        return;
    }

    match action.apply() {
        Ok(()) => log.record(&name, ActionStatus::Applied, None),
        Err(e) => log.record(&name, ActionStatus::Failed, Some(&e.to_string())),
    }
}
