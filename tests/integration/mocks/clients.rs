//! Mock implementations of the monitor's collaborators.
//!
//! - [`MockChainClient`] - Mock implementation of the chain client
//! - [`MockMetricsSink`] - Mock implementation of the metrics sink
//!
//! These mocks allow testing the poll loop without network connections or a
//! metrics registry.

use provider_slash_monitor::{
	models::{BlockResults, Coin},
	services::blockchain::{BlockChainError, ChainClient},
	utils::metrics::{FailureKind, MetricsSink},
};

use async_trait::async_trait;
use mockall::mock;

mock! {
	/// Mock implementation of the chain client.
	///
	/// Simulates node responses for heights, block results and balances.
	pub ChainClient {}

	#[async_trait]
	impl ChainClient for ChainClient {
		async fn get_latest_height(&self) -> Result<u64, BlockChainError>;
		async fn get_block_results(&self, height: u64) -> Result<BlockResults, BlockChainError>;
		async fn get_balance(&self, address: &str) -> Result<Vec<Coin>, BlockChainError>;
	}
}

mock! {
	pub MetricsSink {}

	impl MetricsSink for MetricsSink {
		fn record_alert(&self, network: &str, alert: &str);
		fn record_fetch_failure(&self, network: &str, kind: FailureKind);
		fn set_last_scanned_height(&self, network: &str, height: u64);
	}
}
