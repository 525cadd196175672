//! Logging utilities for the application
//!
//! Installs a global `tracing` subscriber. Output goes to stdout unless
//! `LOG_MODE=file`, in which case it goes to a daily-rolling file under
//! `LOG_DATA_DIR`. Records emitted through the `log` facade are forwarded to
//! the same subscriber.
use std::{env, path::Path};
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "provider-slash-monitor.log";

/// Setup logging for the application
///
/// Reads `LOG_MODE` and `LOG_DATA_DIR` to pick the destination.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	let log_mode = env::var("LOG_MODE").unwrap_or_default();

	if log_mode.eq_ignore_ascii_case("file") {
		let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
		install(file_appender(log_dir), false)
	} else {
		setup_logging_with_writer(std::io::stdout)
	}
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(
	writer: W,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	install(writer, true)
}

/// Creates the daily-rolling appender used in file mode
pub fn file_appender(log_dir: impl AsRef<Path>) -> RollingFileAppender {
	rolling::daily(log_dir, LOG_FILE_PREFIX)
}

/// `RUST_LOG` wins over `LOG_LEVEL`; an unparsable level falls back to info
fn build_filter() -> EnvFilter {
	if let Ok(filter) = EnvFilter::try_from_default_env() {
		return filter;
	}

	let level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
	EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn install<W>(
	writer: W,
	ansi: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(build_filter())
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
