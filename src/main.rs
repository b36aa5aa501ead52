//! `etcrebase` command-line entry point.
use anyhow::Result;
use clap::Parser;

use etcrebase::{cli, commands, config, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let log = logging::Logger::new("rebase");
    let header = logging::RunHeader {
        source: args.opts.source.clone(),
        target: args.target.clone(),
        rules: config::resolve_rules_path(args.opts.rules.as_deref()),
        dry_run: args.opts.dry_run,
    };
    logging::init_subscriber(args.verbose, log.log_path(), &header);

    commands::rebase::run(&args.target, &args.opts, &log)
}
