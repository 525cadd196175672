use serde::{Deserialize, Serialize};
use std::{collections::HashSet, net::SocketAddr, path::Path, time::Duration};
use tracing::warn;

use crate::models::{AttributeEncoding, ConfigLoader, Endpoint, EndpointKind};

use super::error::ConfigError;

const DEFAULT_MAX_RETRIES: u32 = 2;

fn default_max_retries() -> u32 {
	DEFAULT_MAX_RETRIES
}

/// Balance alerting settings shared by every network
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BalanceConfig {
	/// Inclusive lower bound of an acceptable balance, in base denomination units
	pub threshold: u128,
}

/// A single watched network
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
	pub name: String,
	pub rpc_endpoint: String,
	pub grpc_endpoint: String,
	pub interval_secs: u64,
	pub provider_addresses: Vec<String>,
	#[serde(default)]
	pub attribute_encoding: AttributeEncoding,
	/// Retries for transient HTTP failures, applied by the transport
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
}

impl NetworkConfig {
	pub fn rpc(&self) -> Result<Endpoint, ConfigError> {
		Endpoint::new(EndpointKind::Rpc, &self.rpc_endpoint)
			.map_err(|e| self.scoped(e))
	}

	pub fn grpc(&self) -> Result<Endpoint, ConfigError> {
		Endpoint::new(EndpointKind::Grpc, &self.grpc_endpoint)
			.map_err(|e| self.scoped(e))
	}

	/// Attaches this network's name to an endpoint validation error
	fn scoped(&self, err: ConfigError) -> ConfigError {
		match err {
			ConfigError::ValidationError { message, .. } => {
				ConfigError::network_validation_error(&self.name, message)
			}
			other => other,
		}
	}

	pub fn interval(&self) -> Duration {
		Duration::from_secs(self.interval_secs)
	}

	/// Watched provider addresses, with duplicates collapsed
	pub fn provider_set(&self) -> HashSet<String> {
		let mut providers = HashSet::with_capacity(self.provider_addresses.len());
		for address in &self.provider_addresses {
			if !providers.insert(address.clone()) {
				warn!(
					network = %self.name,
					address = %address,
					"duplicate provider address ignored"
				);
			}
		}
		providers
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.is_empty()
			|| !self
				.name
				.chars()
				.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::network_validation_error(
				&self.name,
				"name must contain only lowercase letters, numbers, and underscores",
			));
		}

		self.rpc()?;
		self.grpc()?;

		if self.interval_secs == 0 {
			return Err(ConfigError::network_validation_error(
				&self.name,
				"interval_secs must be greater than 0",
			));
		}

		if self.provider_addresses.is_empty() {
			return Err(ConfigError::network_validation_error(
				&self.name,
				"at least one provider address is required",
			));
		}

		if self
			.provider_addresses
			.iter()
			.any(|address| address.trim().is_empty())
		{
			return Err(ConfigError::network_validation_error(
				&self.name,
				"provider addresses must not be empty",
			));
		}

		Ok(())
	}
}

/// Root of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
	/// Bind address of the Prometheus listener; no listener when absent
	#[serde(default)]
	pub metrics_address: Option<String>,
	/// Balance checks are skipped when absent
	#[serde(default)]
	pub balance: Option<BalanceConfig>,
	pub networks: Vec<NetworkConfig>,
}

impl MonitorConfig {
	pub fn threshold(&self) -> Option<u128> {
		self.balance.as_ref().map(|balance| balance.threshold)
	}
}

impl ConfigLoader for MonitorConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::file_error(format!(
				"config file '{}' not found",
				path.display()
			)));
		}

		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"config file '{}' must be a .json file",
				path.display()
			)));
		}

		let file = std::fs::File::open(path)?;
		let config: MonitorConfig = serde_json::from_reader(file)?;

		// Validate the config after loading
		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::validation_error(
				"at least one network must be configured",
			));
		}

		let mut names = HashSet::new();
		for network in &self.networks {
			network.validate()?;
			if !names.insert(network.name.as_str()) {
				return Err(ConfigError::network_validation_error(
					&network.name,
					"network names must be unique",
				));
			}
		}

		if let Some(address) = &self.metrics_address {
			address.parse::<SocketAddr>().map_err(|e| {
				ConfigError::validation_error(format!(
					"invalid metrics_address '{}': {}",
					address, e
				))
			})?;
		}

		Ok(())
	}
}
