//! Logging bootstrap and panic capture.
//!
//! # Responsibility
//! - Initialize the `log` backend on stderr exactly once per process.
//! - Emit stable `event=... module=... status=...` diagnostic events.
//!
//! # Invariants
//! - Logging init is idempotent for the same level.
//! - Logging initialization must not panic.
//! - Re-initialization with a different level is rejected.

use flexi_logger::{Logger, LoggerHandle};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::panic::PanicHookInfo;

const MAX_PANIC_MESSAGE_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Initializes stderr logging at `level`.
///
/// # Invariants
/// - Calling this function repeatedly with the same level is idempotent.
/// - Re-initialization with a different `level` is rejected.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when logger backend setup fails.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        log_panics();
        info!(
            "event=core_init module=core status=ok level={} platform={} build_mode={} version={}",
            level,
            std::env::consts::OS,
            build_mode(),
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;

    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{level}`",
            state.level
        ));
    }
    Ok(())
}

/// Returns the active log level, or `None` before `init_logging` succeeds.
pub fn logging_status() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

// Only called from the logger's one-time init, so the hook is chained once.
fn log_panics() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("event=panic module=core status=error {}", PanicReport::from(info));
        previous(info);
    }));
}

/// One-line description of a panic for the log.
struct PanicReport {
    location: String,
    message: String,
}

impl From<&PanicHookInfo<'_>> for PanicReport {
    fn from(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string payload>");

        Self {
            location: info
                .location()
                .map_or_else(|| "unknown".to_string(), ToString::to_string),
            message: single_line(message, MAX_PANIC_MESSAGE_CHARS),
        }
    }
}

impl Display for PanicReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "location={} message=\"{}\"", self.location, self.message)
    }
}

// Feature properties can end up in panic messages; keep them on one bounded line.
fn single_line(text: &str, max_chars: usize) -> String {
    let mut words = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some((cut, _)) = words.char_indices().nth(max_chars) {
        words.truncate(cut);
        words.push_str("...");
    }
    words
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, normalize_level, single_line};

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(
            normalize_level("INFO").expect("INFO should normalize"),
            "info"
        );
        assert_eq!(
            normalize_level(" warning ").expect("warning should normalize"),
            "warn"
        );
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn single_line_collapses_whitespace_and_truncates() {
        assert_eq!(single_line("abbr\nTX\r\n  year", 40), "abbr TX year");
        assert_eq!(single_line("abcdefghij", 4), "abcd...");
        assert_eq!(single_line("abcd", 4), "abcd");
    }

    #[test]
    fn init_logging_is_idempotent_for_same_level_and_rejects_conflicts() {
        assert!(init_logging("loud").is_err());

        init_logging("info").expect("first init should succeed");
        init_logging(" INFO ").expect("same level should be idempotent");

        let error = init_logging("debug").expect_err("level conflict should fail");
        assert!(error.contains("refusing to switch"));
        assert_eq!(logging_status(), Some("info"));
    }
}
