use serde::Serialize;
use std::fmt;

/// Why a provider was slashed, derived from where the slash event was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlashCause {
	/// Emitted by a transaction: the provider responded with an invalid result
	InvalidResponse,
	/// Emitted at the end of the block: the request timed out without a response
	Timeout,
}

impl fmt::Display for SlashCause {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::InvalidResponse => write!(f, "invalid response"),
			Self::Timeout => write!(f, "response timeout"),
		}
	}
}

/// A slash event against a watched provider, decoded from one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlashEvent {
	pub cause: SlashCause,
	pub provider: String,
	/// Empty when the event carries no `request_id` attribute
	pub request_id: String,
}

impl SlashEvent {
	/// Human-readable alert text, also used as the metric label value
	pub fn alert_message(&self) -> String {
		format!(
			"slashed for request id {} due to {}",
			self.request_id, self.cause
		)
	}
}
