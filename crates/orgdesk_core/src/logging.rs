//! Process-wide diagnostic logging for the state core.
//!
//! # Responsibility
//! - Start one rolling file logger per process.
//! - Capture panics as single-line, length-capped error events.
//!
//! # Invariants
//! - Log lines carry identifiers and statuses, never entity names or bodies.
//! - A second init with identical options is a no-op; differing options fail.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "orgdesk";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;
const PANIC_SUMMARY_CHARS: usize = 200;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    options: LogOptions,
    _handle: LoggerHandle,
}

/// Validated logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: &'static str,
    pub directory: PathBuf,
}

impl LogOptions {
    pub fn parse(level: &str, directory: &str) -> Result<Self, LoggingError> {
        Ok(Self {
            level: parse_level(level)?,
            directory: parse_directory(directory)?,
        })
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    EmptyDirectory,
    RelativeDirectory(String),
    CreateDirectory { path: PathBuf, source: std::io::Error },
    Backend(String),
    AlreadyActive { active: LogOptions },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => {
                write!(f, "unknown log level `{level}` (trace|debug|info|warn|error)")
            }
            Self::EmptyDirectory => write!(f, "log directory is empty"),
            Self::RelativeDirectory(path) => {
                write!(f, "log directory must be absolute, got `{path}`")
            }
            Self::CreateDirectory { path, source } => {
                write!(f, "cannot create log directory `{}`: {source}", path.display())
            }
            Self::Backend(message) => write!(f, "logger backend failed: {message}"),
            Self::AlreadyActive { active } => write!(
                f,
                "logger already active at `{}` with level `{}`",
                active.directory.display(),
                active.level
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Starts file logging under `directory` at `level`.
///
/// # Errors
/// - Invalid level or non-absolute directory.
/// - Directory creation or backend start failure.
/// - A logger is already active with different options.
pub fn init_logging(level: &str, directory: &str) -> Result<(), LoggingError> {
    let options = LogOptions::parse(level, directory)?;

    let active = ACTIVE.get_or_try_init(|| start(options.clone()))?;
    if active.options != options {
        return Err(LoggingError::AlreadyActive {
            active: active.options.clone(),
        });
    }
    Ok(())
}

/// Options of the running logger, if any.
pub fn logging_status() -> Option<LogOptions> {
    ACTIVE.get().map(|active| active.options.clone())
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(options: LogOptions) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&options.directory).map_err(|source| {
        LoggingError::CreateDirectory {
            path: options.directory.clone(),
            source,
        }
    })?;

    let handle = Logger::try_with_str(options.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(options.directory.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=core status=ok level={} os={} version={}",
        options.level,
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        options,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    let normalized = level.trim().to_ascii_lowercase();
    let parsed = match normalized.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => return Err(LoggingError::UnknownLevel(normalized)),
    };
    Ok(parsed)
}

fn parse_directory(directory: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = directory.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::EmptyDirectory);
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::RelativeDirectory(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic module=core status=error location={} payload={}",
            location,
            single_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(info);
    }));
}

fn single_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut capped: String = flattened.chars().take(max_chars).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, parse_directory, parse_level, single_line};
    use super::LoggingError;

    #[test]
    fn parse_level_accepts_aliases_and_case() {
        assert_eq!(parse_level(" WARNING ").expect("warning is an alias"), "warn");
        assert_eq!(parse_level("Trace").expect("trace is known"), "trace");
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::UnknownLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn parse_directory_requires_absolute_path() {
        assert!(matches!(parse_directory("  "), Err(LoggingError::EmptyDirectory)));
        assert!(matches!(
            parse_directory("logs/dev"),
            Err(LoggingError::RelativeDirectory(_))
        ));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        assert_eq!(single_line("a\nb", 10), "a b");
        let capped = single_line("abcdefghij", 4);
        assert_eq!(capped, "abcd...");
    }

    #[test]
    fn init_is_idempotent_and_rejects_different_options() {
        let first = tempfile::tempdir().expect("temp dir");
        let second = tempfile::tempdir().expect("temp dir");
        let first_path = first.path().to_str().expect("utf-8 path").to_string();
        let second_path = second.path().to_str().expect("utf-8 path").to_string();

        init_logging("info", &first_path).expect("first init");
        init_logging("INFO", &first_path).expect("same options are a no-op");

        assert!(matches!(
            init_logging("debug", &first_path),
            Err(LoggingError::AlreadyActive { .. })
        ));
        assert!(matches!(
            init_logging("info", &second_path),
            Err(LoggingError::AlreadyActive { .. })
        ));

        let status = logging_status().expect("logger active");
        assert_eq!(status.level, "info");
        assert_eq!(status.directory, first.path());
    }
}
