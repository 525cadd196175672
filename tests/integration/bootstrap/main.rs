use std::{io::Write, sync::Arc};

use provider_slash_monitor::{
	bootstrap::{create_monitor, initialize_monitors},
	models::{BlockResults, ConfigLoader, MonitorConfig},
	services::blockwatcher::MonitorStatus,
	utils::metrics::{MetricsSink, PrometheusMetrics},
};
use serde_json::json;
use tempfile::NamedTempFile;

use crate::integration::mocks::{create_test_network, MockChainClient};

fn write_config(value: serde_json::Value) -> NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
	write!(file, "{}", value).unwrap();
	file
}

#[test]
fn test_initialize_monitors_from_config_file() {
	let file = write_config(json!({
		"metrics_address": "127.0.0.1:9100",
		"balance": { "threshold": 100 },
		"networks": [
			{
				"name": "irishub",
				"rpc_endpoint": "tcp://localhost:26657",
				"grpc_endpoint": "http://localhost:1317",
				"interval_secs": 5,
				"provider_addresses": ["iaa1provider", "iaa1provider", "iaa1other"]
			},
			{
				"name": "irishub_testnet",
				"rpc_endpoint": "http://localhost:36657",
				"grpc_endpoint": "http://localhost:2317",
				"interval_secs": 30,
				"provider_addresses": ["iaa1testnet"],
				"attribute_encoding": "base64",
				"max_retries": 5
			}
		]
	}));

	let config = MonitorConfig::load_from_path(file.path()).unwrap();
	assert_eq!(config.threshold(), Some(100));
	assert_eq!(config.networks[0].provider_set().len(), 2);

	let metrics: Arc<dyn MetricsSink> = Arc::new(PrometheusMetrics::new().unwrap());
	let monitors = initialize_monitors(&config, Some(metrics)).unwrap();

	assert_eq!(monitors.len(), 2);
	assert_eq!(monitors[0].network(), "irishub");
	assert_eq!(monitors[1].network(), "irishub_testnet");
	assert!(monitors
		.iter()
		.all(|monitor| monitor.status() == MonitorStatus::Idle));
}

#[test]
fn test_config_with_unknown_field_is_rejected() {
	let file = write_config(json!({
		"networks": [{
			"name": "irishub",
			"rpc_endpoint": "http://localhost:26657",
			"grpc_endpoint": "http://localhost:1317",
			"interval_secs": 5,
			"provider_addresses": ["iaa1provider"],
			"confirmation_blocks": 2
		}]
	}));

	assert!(MonitorConfig::load_from_path(file.path()).is_err());
}

#[tokio::test]
async fn test_create_monitor_without_threshold_skips_balances() {
	let mut client = MockChainClient::new();
	client.expect_get_latest_height().returning(|| Ok(3));
	client.expect_get_block_results().returning(|height| {
		Ok(BlockResults {
			height,
			..Default::default()
		})
	});
	client.expect_get_balance().never();

	let network = create_test_network("irishub", "http://localhost:26657", "http://localhost:1317");
	let monitor = create_monitor(&network, Arc::new(client), None, None).unwrap();

	monitor.process_cycle().await;
	assert_eq!(monitor.status(), MonitorStatus::Idle);
}
