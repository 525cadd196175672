use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::models::ConfigError;

/// Protocol spoken by a node endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
	/// Tendermint JSON-RPC
	Rpc,
	/// Cosmos SDK gRPC services, reached through their JSON gateway
	Grpc,
}

impl fmt::Display for EndpointKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Rpc => write!(f, "rpc"),
			Self::Grpc => write!(f, "grpc"),
		}
	}
}

/// Network address of a node together with the protocol used to reach it.
///
/// Endpoints are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	kind: EndpointKind,
	url: Url,
}

impl Endpoint {
	/// Parses `url` into an endpoint of the given kind.
	///
	/// Tendermint configs often publish the RPC listener as `tcp://host:port`;
	/// such URLs are accepted for RPC endpoints and rewritten to `http://`.
	pub fn new(kind: EndpointKind, url: &str) -> Result<Self, ConfigError> {
		let url = url.trim();
		let normalized = match (kind, url.strip_prefix("tcp://")) {
			(EndpointKind::Rpc, Some(rest)) => format!("http://{}", rest),
			_ => url.to_string(),
		};

		let parsed = Url::parse(&normalized).map_err(|e| {
			ConfigError::validation_error(format!("invalid {} endpoint '{}': {}", kind, url, e))
		})?;

		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ConfigError::validation_error(format!(
				"{} endpoint '{}' must start with http:// or https://",
				kind, url
			)));
		}

		Ok(Self { kind, url: parsed })
	}

	pub fn kind(&self) -> EndpointKind {
		self.kind
	}

	pub fn url(&self) -> &Url {
		&self.url
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.url, self.kind)
	}
}
