use std::{collections::HashSet, sync::Arc, time::Duration};
use tokio::sync::Notify;

use crate::integration::mocks::{
	create_slash_event, create_test_block, MockChainClient, MockMetricsSink,
};
use provider_slash_monitor::{
	models::{BlockResults, Coin},
	services::{
		blockchain::BlockChainError,
		blockwatcher::{BlockWatcherError, MonitorStatus, ProviderMonitor},
	},
	utils::metrics::{FailureKind, MetricsSink, PrometheusMetrics},
};

fn providers(addresses: &[&str]) -> HashSet<String> {
	addresses.iter().map(|a| a.to_string()).collect()
}

fn create_monitor(
	client: MockChainClient,
	addresses: &[&str],
	metrics: Arc<dyn MetricsSink>,
) -> ProviderMonitor<MockChainClient> {
	ProviderMonitor::new(
		"irishub",
		Arc::new(client),
		providers(addresses),
		Duration::from_secs(3600),
	)
	.unwrap()
	.with_metrics(metrics)
}

#[tokio::test]
async fn test_slashes_are_reported_per_cause() {
	let mut client = MockChainClient::new();
	let mut heights = vec![10, 11].into_iter();
	client
		.expect_get_latest_height()
		.times(2)
		.returning(move || Ok(heights.next().unwrap()));
	client
		.expect_get_block_results()
		.times(2)
		.returning(|height| {
			Ok(match height {
				10 => create_test_block(10, vec![create_slash_event("addrA", "r1")], vec![]),
				11 => create_test_block(
					11,
					vec![create_slash_event("addrB", "r9")],
					vec![create_slash_event("addrA", "r1")],
				),
				_ => panic!("unexpected height {}", height),
			})
		});
	client.expect_get_balance().never();

	let mut metrics = MockMetricsSink::new();
	metrics
		.expect_record_alert()
		.withf(|network, alert| {
			network == "irishub" && alert == "slashed for request id r1 due to invalid response"
		})
		.times(1)
		.return_const(());
	metrics
		.expect_record_alert()
		.withf(|network, alert| {
			network == "irishub" && alert == "slashed for request id r1 due to response timeout"
		})
		.times(1)
		.return_const(());
	metrics
		.expect_set_last_scanned_height()
		.withf(|_, height| *height == 10)
		.times(1)
		.return_const(());
	metrics
		.expect_set_last_scanned_height()
		.withf(|_, height| *height == 11)
		.times(1)
		.return_const(());
	metrics.expect_record_fetch_failure().never();

	let monitor = create_monitor(client, &["addrA"], Arc::new(metrics));

	monitor.process_cycle().await;
	monitor.process_cycle().await;
}

#[tokio::test]
async fn test_low_balance_is_reported() {
	let mut client = MockChainClient::new();
	client
		.expect_get_latest_height()
		.times(1)
		.returning(|| Ok(10));
	client
		.expect_get_block_results()
		.times(1)
		.returning(|height| {
			Ok(BlockResults {
				height,
				..Default::default()
			})
		});
	client
		.expect_get_balance()
		.times(2)
		.returning(|address| match address {
			"addrA" => Ok(vec![Coin::new("uiris", 100)]),
			"addrB" => Ok(vec![Coin::new("uiris", 101)]),
			_ => Err(BlockChainError::request_error("unknown account")),
		});

	let mut metrics = MockMetricsSink::new();
	metrics
		.expect_record_alert()
		.withf(|_, alert| alert == "balance of address(addrA) is almost empty!")
		.times(1)
		.return_const(());
	metrics
		.expect_set_last_scanned_height()
		.times(1)
		.return_const(());

	let monitor = create_monitor(client, &["addrA", "addrB"], Arc::new(metrics)).with_threshold(100);

	monitor.process_cycle().await;
}

#[tokio::test]
async fn test_fetch_failures_are_recorded() {
	let mut client = MockChainClient::new();
	let mut heights = vec![
		Err(BlockChainError::connection_error("connection refused")),
		Ok(5),
	]
	.into_iter();
	client
		.expect_get_latest_height()
		.times(2)
		.returning(move || heights.next().unwrap());
	client
		.expect_get_block_results()
		.times(1)
		.returning(|height| Err(BlockChainError::block_not_found(height)));
	client
		.expect_get_balance()
		.times(1)
		.returning(|_| Err(BlockChainError::request_error("account not found")));

	let mut metrics = MockMetricsSink::new();
	metrics
		.expect_record_fetch_failure()
		.withf(|_, kind| *kind == FailureKind::Height)
		.times(1)
		.return_const(());
	metrics
		.expect_record_fetch_failure()
		.withf(|_, kind| *kind == FailureKind::BlockResults)
		.times(1)
		.return_const(());
	metrics
		.expect_record_fetch_failure()
		.withf(|_, kind| *kind == FailureKind::Balance)
		.times(1)
		.return_const(());
	metrics
		.expect_set_last_scanned_height()
		.withf(|_, height| *height == 5)
		.times(1)
		.return_const(());
	metrics.expect_record_alert().never();

	let monitor = create_monitor(client, &["addrA"], Arc::new(metrics)).with_threshold(100);

	monitor.process_cycle().await;
	monitor.process_cycle().await;
}

#[tokio::test]
async fn test_start_stop_lifecycle() {
	let cycle_started = Arc::new(Notify::new());

	let mut client = MockChainClient::new();
	let notify = cycle_started.clone();
	client.expect_get_latest_height().returning(move || {
		notify.notify_one();
		Ok(1)
	});
	client.expect_get_block_results().returning(|height| {
		Ok(BlockResults {
			height,
			..Default::default()
		})
	});

	let mut metrics = MockMetricsSink::new();
	metrics.expect_set_last_scanned_height().return_const(());

	let monitor = Arc::new(create_monitor(client, &["addrA"], Arc::new(metrics)));
	assert_eq!(monitor.status(), MonitorStatus::Idle);

	let handle = tokio::spawn({
		let monitor = monitor.clone();
		async move { monitor.start().await }
	});

	cycle_started.notified().await;
	monitor.stop();

	let result = tokio::time::timeout(Duration::from_secs(5), handle)
		.await
		.expect("monitor did not observe the stop request")
		.unwrap();
	assert!(result.is_ok());
	assert_eq!(monitor.status(), MonitorStatus::Stopped);

	let restart = monitor.start().await;
	assert!(matches!(restart, Err(BlockWatcherError::AlreadyStarted(_))));
}

#[tokio::test]
async fn test_alerts_are_exported_to_prometheus() {
	let mut client = MockChainClient::new();
	client
		.expect_get_latest_height()
		.times(1)
		.returning(|| Ok(42));
	client
		.expect_get_block_results()
		.times(1)
		.returning(|height| {
			Ok(create_test_block(
				height,
				vec![],
				vec![create_slash_event("addrA", "7bd3")],
			))
		});

	let metrics = Arc::new(PrometheusMetrics::new().unwrap());
	let monitor = create_monitor(client, &["addrA"], metrics.clone());

	monitor.process_cycle().await;

	let output = String::from_utf8(metrics.gather().unwrap()).unwrap();
	assert!(output.contains("provider_monitor_alerts_total"));
	assert!(output.contains("alert=\"slashed for request id 7bd3 due to response timeout\""));
	assert!(output.contains("provider_monitor_last_scanned_height{network=\"irishub\"} 42"));
}
