//! Configuration error types.
//!
//! This module defines the error types that can occur while loading and
//! validating the monitor configuration file.

use log::error;
use std::{error::Error, fmt};

/// Errors that can occur during configuration operations
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// A value failed validation, optionally scoped to one network entry
	ValidationError {
		network: Option<String>,
		message: String,
	},

	/// Failed to parse configuration file
	ParseError(String),

	/// File system error during configuration loading
	FileError(String),
}

impl ConfigError {
	/// Format the error message for display
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError {
				network: Some(network),
				message,
			} => format!("Validation error in network '{}': {}", network, message),
			Self::ValidationError {
				network: None,
				message,
			} => format!("Validation error: {}", message),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
			Self::FileError(msg) => format!("File error: {}", msg),
		}
	}

	/// Create a new top-level validation error and log it
	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError {
			network: None,
			message: msg.into(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Create a new validation error for a single network entry and log it
	pub fn network_validation_error(network: impl Into<String>, msg: impl Into<String>) -> Self {
		let error = Self::ValidationError {
			network: Some(network.into()),
			message: msg.into(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Create a new parse error and log it
	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a new file error and log it
	pub fn file_error(msg: impl Into<String>) -> Self {
		let error = Self::FileError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
	fn from(err: std::io::Error) -> Self {
		Self::file_error(err.to_string())
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string())
	}
}
