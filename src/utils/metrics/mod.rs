//! Metrics module for the application.
//!
//! - Defines the [`MetricsSink`] capability the monitors report into.
//! - Provides [`PrometheusMetrics`], a sink backed by its own Prometheus registry.

pub mod server;

use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

/// Kind of chain query that failed during a scan cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
	Height,
	BlockResults,
	Balance,
}

impl FailureKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Height => "height",
			Self::BlockResults => "block_results",
			Self::Balance => "balance",
		}
	}
}

/// Write-only sink for monitor observations.
///
/// Implementations must tolerate concurrent reports from several monitors;
/// reports with identical labels accumulate into the same series.
pub trait MetricsSink: Send + Sync {
	/// Records one occurrence of a human-readable alert (slash or low balance)
	fn record_alert(&self, network: &str, alert: &str);

	/// Records a failed chain query
	fn record_fetch_failure(&self, network: &str, kind: FailureKind);

	/// Publishes the height up to which `network` has been scanned
	fn set_last_scanned_height(&self, network: &str, height: u64);
}

/// Prometheus-backed metrics sink
#[derive(Clone)]
pub struct PrometheusMetrics {
	registry: Registry,
	alerts: IntCounterVec,
	fetch_failures: IntCounterVec,
	last_scanned_height: IntGaugeVec,
}

impl PrometheusMetrics {
	/// Creates the collectors and registers them with a fresh registry
	pub fn new() -> Result<Self, prometheus::Error> {
		let registry = Registry::new();

		// The alert label carries free-form text, so its cardinality is unbounded.
		let alerts = IntCounterVec::new(
			Opts::new(
				"provider_monitor_alerts_total",
				"Slash and low balance alerts raised for watched providers",
			),
			&["network", "alert"],
		)?;
		registry.register(Box::new(alerts.clone()))?;

		let fetch_failures = IntCounterVec::new(
			Opts::new(
				"provider_monitor_fetch_failures_total",
				"Failed chain queries by kind",
			),
			&["network", "kind"],
		)?;
		registry.register(Box::new(fetch_failures.clone()))?;

		let last_scanned_height = IntGaugeVec::new(
			Opts::new(
				"provider_monitor_last_scanned_height",
				"Height up to which blocks have been scanned",
			),
			&["network"],
		)?;
		registry.register(Box::new(last_scanned_height.clone()))?;

		Ok(Self {
			registry,
			alerts,
			fetch_failures,
			last_scanned_height,
		})
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Gather all metrics and encode them in the Prometheus text format.
	pub fn gather(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
		let encoder = TextEncoder::new();
		let metric_families = self.registry.gather();
		let mut buffer = Vec::new();
		encoder.encode(&metric_families, &mut buffer)?;
		Ok(buffer)
	}
}

impl MetricsSink for PrometheusMetrics {
	fn record_alert(&self, network: &str, alert: &str) {
		self.alerts.with_label_values(&[network, alert]).inc();
	}

	fn record_fetch_failure(&self, network: &str, kind: FailureKind) {
		self.fetch_failures
			.with_label_values(&[network, kind.as_str()])
			.inc();
	}

	fn set_last_scanned_height(&self, network: &str, height: u64) {
		self.last_scanned_height
			.with_label_values(&[network])
			.set(i64::try_from(height).unwrap_or(i64::MAX));
	}
}
