//! Block watcher error types and handling.
//!
//! Errors raised while constructing or starting a provider monitor. Nothing
//! inside the poll loop is reported through these types; scan failures are
//! logged and skipped instead.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors during monitor setup and lifecycle transitions
#[derive(Debug)]
pub enum BlockWatcherError {
	/// The monitor was started while already polling or after it stopped
	AlreadyStarted(String),
	/// The monitor was built with unusable parameters
	ConfigurationError(String),
}

impl BlockWatcherError {
	fn format_message(&self) -> String {
		match self {
			Self::AlreadyStarted(msg) => format!("Already started: {}", msg),
			Self::ConfigurationError(msg) => format!("Configuration error: {}", msg),
		}
	}

	/// Creates a new lifecycle error with logging
	pub fn already_started(msg: impl Into<String>) -> Self {
		let error = Self::AlreadyStarted(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new configuration error with logging
	pub fn configuration_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigurationError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for BlockWatcherError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for BlockWatcherError {}
