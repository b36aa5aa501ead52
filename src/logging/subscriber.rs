//! Tracing subscriber for a rebase run: console output plus a per-run log
//! file that opens with the run's source, target and rule list.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::types::ActionStatus;
use super::utils::{format_timestamp, format_utc_datetime};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "etcrebase::stage";

/// Target used for dry-run lines.
pub(super) const DRY_RUN_TARGET: &str = "etcrebase::dry_run";

/// Target used for recorded action outcomes. Events carry a `status` field.
pub(super) const ACTION_TARGET: &str = "etcrebase::action";

/// The parameters of one run, written at the top of the log file.
#[derive(Debug, Clone)]
pub struct RunHeader {
    /// Tree configuration is read from.
    pub source: PathBuf,
    /// Tree configuration is written to.
    pub target: PathBuf,
    /// Rule list in use.
    pub rules: PathBuf,
    /// Whether actions are only planned.
    pub dry_run: bool,
}

impl fmt::Display for RunHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = option_env!("ETCREBASE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        let mode = if self.dry_run { "dry run" } else { "apply" };
        writeln!(f, "# etcrebase {version} ({mode}) {}", format_utc_datetime())?;
        writeln!(f, "# source: {}", self.source.display())?;
        writeln!(f, "# target: {}", self.target.display())?;
        writeln!(f, "# rules:  {}", self.rules.display())
    }
}

/// What an event means for rendering.
enum Kind {
    Stage,
    DryRun,
    Action(String),
    Plain(Level),
}

/// The `message` and optional `status` fields of an event.
#[derive(Default)]
struct Fields {
    message: String,
    status: Option<String>,
}

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

fn classify(event: &tracing::Event<'_>) -> (Kind, String) {
    let mut fields = Fields::default();
    event.record(&mut fields);
    let metadata = event.metadata();
    let kind = match (metadata.target(), fields.status) {
        (STAGE_TARGET, _) => Kind::Stage,
        (DRY_RUN_TARGET, _) => Kind::DryRun,
        (ACTION_TARGET, Some(status)) => Kind::Action(status),
        _ => Kind::Plain(*metadata.level()),
    };
    (kind, fields.message)
}

/// Appends every event to the run's log file, one timestamped line each.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write `header`, and keep the file open for appending.
    pub(super) fn create(path: &Path, header: &RunHeader) -> std::io::Result<Self> {
        let mut file = fs::File::create(path)?;
        write!(file, "{header}")?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let (kind, msg) = classify(event);
        let tag = match kind {
            Kind::Stage => "==>".to_string(),
            Kind::DryRun => "[dry run]".to_string(),
            Kind::Action(status) => format!("[{status}]"),
            Kind::Plain(level) => format!("[{}]", level.as_str().to_lowercase()),
        };
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{} {tag} {msg}", format_timestamp()).ok();
        }
    }
}

/// Console rendering: stage headers, dry-run lines, action outcomes and
/// levelled messages, coloured with ANSI escapes.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let (kind, msg) = classify(event);
        match kind {
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Kind::Action(status) => {
                let colour = if status == ActionStatus::Failed.label() {
                    "31"
                } else if status == ActionStatus::Applied.label() {
                    "32"
                } else {
                    "2"
                };
                writeln!(writer, "  \x1b[{colour}m{status:>7}\x1b[0m {msg}")
            }
            Kind::Plain(Level::ERROR) => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            Kind::Plain(Level::WARN) => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Plain(Level::INFO) => writeln!(writer, "  {msg}"),
            Kind::Plain(_) => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for a run.
///
/// The console shows `INFO` and above (`DEBUG` with `verbose`), warnings and
/// errors on stderr. When `log_file` is given, every event at `DEBUG` and
/// above is also written there beneath `header`; a log file that cannot be
/// created is reported on the console and skipped.
pub fn init_subscriber(verbose: bool, log_file: Option<&Path>, header: &RunHeader) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));
    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| match FileLayer::create(path, header) {
        Ok(layer) => Some(layer.with_filter(LevelFilter::DEBUG)),
        Err(e) => {
            open_error = Some(format!("cannot write log file {}: {e}", path.display()));
            None
        }
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(msg) = open_error {
        tracing::warn!("{msg}");
    }
}
