//! Blockchain error types and handling.
//!
//! This module provides error handling for chain queries, including network
//! connectivity, request processing, and malformed node responses.

use log::error;

/// Represents possible errors that can occur during chain queries
#[derive(Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	ConnectionError(String),

	/// Errors related to malformed requests or invalid responses
	RequestError(String),

	/// When results for a requested block cannot be found on the node
	///
	/// Contains the block height that was not found
	BlockNotFound(u64),

	/// Internal errors within the blockchain client
	InternalError(String),
}

impl BlockChainError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::RequestError(msg) => format!("Request error: {}", msg),
			Self::BlockNotFound(height) => format!("Block not found: {}", height),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new block not found error with logging
	pub fn block_not_found(height: u64) -> Self {
		let error = Self::BlockNotFound(height);
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

// Standard error trait implementations
impl std::fmt::Display for BlockChainError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for BlockChainError {}

/// Whether the request never reached the node, looking through errors
/// wrapped by the retry middleware
fn is_transport_failure(err: &reqwest_middleware::Error) -> bool {
	let unreachable = |e: &reqwest::Error| e.is_connect() || e.is_timeout();
	match err {
		reqwest_middleware::Error::Reqwest(e) => unreachable(e),
		reqwest_middleware::Error::Middleware(e) => e
			.chain()
			.filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
			.any(unreachable),
	}
}

impl From<reqwest_middleware::Error> for BlockChainError {
	fn from(err: reqwest_middleware::Error) -> Self {
		if is_transport_failure(&err) {
			Self::connection_error(err.to_string())
		} else {
			Self::request_error(err.to_string())
		}
	}
}

impl From<reqwest::Error> for BlockChainError {
	fn from(err: reqwest::Error) -> Self {
		reqwest_middleware::Error::Reqwest(err).into()
	}
}

impl From<serde_json::Error> for BlockChainError {
	fn from(err: serde_json::Error) -> Self {
		Self::request_error(format!("unexpected response format: {}", err))
	}
}
