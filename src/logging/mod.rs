//! Logging for a rebase run: console output, a per-run log file, and the
//! action ledger behind the closing summary.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{RunHeader, init_subscriber};
pub use types::{ActionEntry, ActionStatus};

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Create a Logger backed by an isolated per-thread tracing subscriber whose
/// [`FileLayer`](subscriber::FileLayer) writes to a fresh temporary
/// directory, so that events emitted by logger methods can be read back.
///
/// The returned [`tracing::dispatcher::DefaultGuard`] must be kept alive
/// for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let header = RunHeader {
        source: std::path::PathBuf::from("/"),
        target: tmp.path().to_path_buf(),
        rules: std::path::PathBuf::from(crate::config::DEFAULT_RULES_FILE),
        dry_run: false,
    };
    let file_layer =
        subscriber::FileLayer::create(&path, &header).expect("failed to create file layer");
    let log = Logger::with_log_file(Some(path));
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
