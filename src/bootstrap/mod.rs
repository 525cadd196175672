//! Bootstrap module for building monitors from configuration.
//!
//! Turns a validated [`MonitorConfig`] into one [`ProviderMonitor`] per
//! configured network, each with its own Cosmos client and a shared metrics
//! sink.

use std::{error::Error, sync::Arc};
use tracing::info;

use crate::{
	models::{MonitorConfig, NetworkConfig},
	services::{
		blockchain::{ChainClient, CosmosClient},
		blockwatcher::{BlockWatcherError, ProviderMonitor},
	},
	utils::metrics::MetricsSink,
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Builds an idle monitor for `network` around an existing client.
///
/// # Errors
/// Returns an error if the network has no providers or a zero interval.
pub fn create_monitor<C: ChainClient>(
	network: &NetworkConfig,
	client: Arc<C>,
	threshold: Option<u128>,
	metrics: Option<Arc<dyn MetricsSink>>,
) -> std::result::Result<ProviderMonitor<C>, BlockWatcherError> {
	let mut monitor = ProviderMonitor::new(
		network.name.clone(),
		client,
		network.provider_set(),
		network.interval(),
	)?;

	if let Some(threshold) = threshold {
		monitor = monitor.with_threshold(threshold);
	}

	if let Some(metrics) = metrics {
		monitor = monitor.with_metrics(metrics);
	}

	Ok(monitor)
}

/// Builds one monitor per configured network.
///
/// # Errors
/// Returns an error if any client or monitor cannot be constructed. No
/// monitor is returned in that case.
pub fn initialize_monitors(
	config: &MonitorConfig,
	metrics: Option<Arc<dyn MetricsSink>>,
) -> Result<Vec<Arc<ProviderMonitor<CosmosClient>>>> {
	let threshold = config.threshold();
	if threshold.is_none() {
		info!("No balance threshold configured, balance checks are disabled");
	}

	let mut monitors = Vec::with_capacity(config.networks.len());
	for network in &config.networks {
		let client = Arc::new(CosmosClient::new(network)?);
		let monitor = create_monitor(network, client, threshold, metrics.clone())?;

		info!(
			network = %network.name,
			providers = network.provider_addresses.len(),
			interval_secs = network.interval_secs,
			"Monitor initialized"
		);
		monitors.push(Arc::new(monitor));
	}

	Ok(monitors)
}
