//! Log file location and timestamps.
use std::path::PathBuf;

/// Path of the log file for `command`:
/// `$XDG_CACHE_HOME/etcrebase/<command>.log`, else
/// `$HOME/.cache/etcrebase/<command>.log`. Creates the directory.
///
/// Returns `None` if neither variable is set or the directory cannot be
/// created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    let dir = cache.join("etcrebase");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current UTC time of day with milliseconds, for log lines.
pub(super) fn format_timestamp() -> String {
    chrono::Utc::now().format("%H:%M:%S%.3f").to_string()
}
