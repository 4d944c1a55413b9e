//! Logging setup
//
// A plain-text file log is always written, one timestamped folder per run.
// Colored console output is added with `--verbose`.
//
// Usage:
//   Call `logging::init(logs_dir, verbose)` at the start of main().
//   Keep the returned guard alive for the program's duration.

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use chrono::Local;
use tracing::Subscriber;
use tracing_subscriber::fmt::{
    format::{FormatEvent, FormatFields, Writer},
    FmtContext,
};
use tracing_subscriber::registry::LookupSpan;

const DEFAULT_FILTER: &str = "info";

pub struct LogGuard(#[allow(dead_code)] tracing_appender::non_blocking::WorkerGuard);

/// Initializes logging.
///
/// - `logs_dir`: parent of the per-run log folders
/// - `verbose`: also log to stdout with [`ConsoleFormatter`]
pub fn init(logs_dir: &Path, verbose: bool) -> anyhow::Result<LogGuard> {
    let log_folder = logs_dir.join(Local::now().format("%Y-%m-%d_%H-%M-%S").to_string());
    fs::create_dir_all(&log_folder)
        .with_context(|| format!("Failed to create log folder {}", log_folder.display()))?;
    let log_path = log_folder.join("aurora.log");

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {} for writing", log_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    use tracing_subscriber::prelude::*;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    // File log: no ANSI codes
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    if verbose {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .event_format(ConsoleFormatter);
        registry.with(console_layer).init();
    } else {
        registry.init();
    }

    tracing::debug!("Logging to {}", log_path.display());
    Ok(LogGuard(guard))
}

/// Colored single-line console output: time, level, target, then the fields.
pub struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let (level_str, level_color) = match *meta.level() {
            tracing::Level::ERROR => ("ERROR", "\x1b[1;91m"),
            tracing::Level::WARN => ("WARN ", "\x1b[1;93m"),
            tracing::Level::INFO => ("INFO ", "\x1b[1;94m"),
            tracing::Level::DEBUG => ("DEBUG", "\x1b[1;92m"),
            tracing::Level::TRACE => ("TRACE", "\x1b[1;95m"),
        };
        write!(writer, "\x1b[2;36m{}\x1b[0m ", Local::now().format("%H:%M:%S%.3f"))?;
        write!(writer, "{level_color}{level_str}\x1b[0m ")?;
        write!(writer, "\x1b[4;2;33m{}\x1b[0m: ", meta.target())?;

        let mut visitor = MsgVisitor(String::new());
        event.record(&mut visitor);
        writeln!(writer, "{}", visitor.0.trim())
    }
}

/// Joins every recorded field value with spaces, the message first.
struct MsgVisitor(String);

impl MsgVisitor {
    fn separate(&mut self) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
    }
}

impl tracing_subscriber::field::Visit for MsgVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        use std::fmt::Write as _;
        self.separate();
        if field.name() == "message" {
            let _ = write!(self.0, "{value:?}");
        } else {
            let _ = write!(self.0, "{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.separate();
        if field.name() == "message" {
            self.0.push_str(value);
        } else {
            self.0.push_str(field.name());
            self.0.push('=');
            self.0.push_str(value);
        }
    }
}
