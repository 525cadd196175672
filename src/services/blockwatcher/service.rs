//! Provider monitor: the poll loop driving block scans and balance checks.
//!
//! Each monitor owns the scan progress of one network. A cycle fetches the
//! latest height, classifies the results of every height not yet scanned,
//! checks the balance of every watched provider and then sleeps for the
//! configured interval. Chain query failures never end the loop.

use std::{
	collections::HashSet,
	ops::RangeInclusive,
	sync::{Arc, Mutex as StdMutex, PoisonError},
	time::Duration,
};
use tokio::sync::{watch, Mutex};
use tracing::{error, info, instrument, warn};

use crate::{
	models::SlashEvent,
	services::{
		balance::is_at_or_below_threshold,
		blockchain::ChainClient,
		blockwatcher::BlockWatcherError,
		filter::classify_block,
	},
	utils::metrics::{FailureKind, MetricsSink},
};

/// Lifecycle state of a [`ProviderMonitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
	/// Constructed, not started yet
	Idle,
	/// Running scan cycles
	Polling,
	/// Stop observed, loop returned; terminal
	Stopped,
}

#[derive(Debug, Default)]
struct ScanState {
	/// `None` until the first successful cycle
	last_scanned_height: Option<u64>,
}

impl ScanState {
	/// Heights to scan when the chain is at `current_height`.
	///
	/// The first cycle only covers `current_height` itself: there is no
	/// backfill of blocks produced before the monitor started.
	fn pending_range(&self, current_height: u64) -> RangeInclusive<u64> {
		let start = match self.last_scanned_height {
			Some(last) => last.saturating_add(1),
			None => current_height,
		};
		start..=current_height
	}

	fn advance_to(&mut self, height: u64) -> u64 {
		let last = self
			.last_scanned_height
			.map_or(height, |last| last.max(height));
		self.last_scanned_height = Some(last);
		last
	}
}

/// Watches one network for slash events and low balances of a provider set
pub struct ProviderMonitor<C: ChainClient> {
	network: String,
	client: Arc<C>,
	providers: HashSet<String>,
	interval: Duration,
	threshold: Option<u128>,
	metrics: Option<Arc<dyn MetricsSink>>,
	state: Mutex<ScanState>,
	status: StdMutex<MonitorStatus>,
	stop_tx: watch::Sender<bool>,
}

impl<C: ChainClient> ProviderMonitor<C> {
	/// Creates an idle monitor.
	///
	/// # Errors
	/// Returns [`BlockWatcherError::ConfigurationError`] when `providers` is
	/// empty or `interval` is zero.
	pub fn new(
		network: impl Into<String>,
		client: Arc<C>,
		providers: HashSet<String>,
		interval: Duration,
	) -> Result<Self, BlockWatcherError> {
		let network = network.into();

		if providers.is_empty() {
			return Err(BlockWatcherError::configuration_error(format!(
				"monitor for {} needs at least one provider address",
				network
			)));
		}

		if interval.is_zero() {
			return Err(BlockWatcherError::configuration_error(format!(
				"monitor for {} needs a polling interval greater than zero",
				network
			)));
		}

		let (stop_tx, _) = watch::channel(false);

		Ok(Self {
			network,
			client,
			providers,
			interval,
			threshold: None,
			metrics: None,
			state: Mutex::new(ScanState::default()),
			status: StdMutex::new(MonitorStatus::Idle),
			stop_tx,
		})
	}

	/// Enables balance checks against an inclusive lower bound
	pub fn with_threshold(mut self, threshold: u128) -> Self {
		self.threshold = Some(threshold);
		self
	}

	/// Reports alerts, failures and progress to `metrics`
	pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
		self.metrics = Some(metrics);
		self
	}

	pub fn network(&self) -> &str {
		&self.network
	}

	pub fn status(&self) -> MonitorStatus {
		*self.status.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn set_status(&self, status: MonitorStatus) {
		*self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
	}

	/// Runs scan cycles until [`stop`](Self::stop) is observed.
	///
	/// Returns once the monitor reaches [`MonitorStatus::Stopped`]. A stop
	/// request lets the cycle in progress finish and cuts the following sleep
	/// short; no new cycle starts afterwards.
	///
	/// # Errors
	/// Returns [`BlockWatcherError::AlreadyStarted`] unless the monitor is idle.
	#[instrument(skip_all, fields(network = %self.network))]
	pub async fn start(&self) -> Result<(), BlockWatcherError> {
		{
			let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
			if *status != MonitorStatus::Idle {
				return Err(BlockWatcherError::already_started(format!(
					"monitor for {} is {:?}",
					self.network, *status
				)));
			}
			*status = MonitorStatus::Polling;
		}

		let mut providers: Vec<&str> = self.providers.iter().map(String::as_str).collect();
		providers.sort_unstable();
		info!(
			interval = ?self.interval,
			"monitor started, provider addresses: {:?}",
			providers
		);

		let mut stop_rx = self.stop_tx.subscribe();

		loop {
			self.process_cycle().await;

			if *stop_rx.borrow_and_update() {
				break;
			}

			tokio::select! {
				_ = tokio::time::sleep(self.interval) => {}
				_ = stop_rx.changed() => {}
			}

			if *stop_rx.borrow_and_update() {
				break;
			}
		}

		self.set_status(MonitorStatus::Stopped);
		info!("monitor stopped");
		Ok(())
	}

	/// Requests the poll loop to stop. Never blocks; repeated calls are no-ops.
	pub fn stop(&self) {
		let requested = self.stop_tx.send_if_modified(|stopped| {
			let first = !*stopped;
			*stopped = true;
			first
		});

		if requested {
			info!(network = %self.network, "stop requested");
		}
	}

	/// Executes a single scan cycle.
	///
	/// Scans every height between the last scanned height and the current
	/// chain height, then checks balances. Heights whose results cannot be
	/// fetched are skipped for good; the scan still advances past them.
	#[instrument(skip_all, fields(network = %self.network))]
	pub async fn process_cycle(&self) {
		let current_height = match self.client.get_latest_height().await {
			Ok(height) => height,
			Err(e) => {
				warn!("failed to retrieve the latest block height: {}", e);
				self.record_failure(FailureKind::Height);
				return;
			}
		};

		info!("block height: {}", current_height);

		let mut state = self.state.lock().await;

		self.scan_range(state.pending_range(current_height)).await;

		if let Some(threshold) = self.threshold {
			self.check_balances(threshold).await;
		}

		let last_scanned_height = state.advance_to(current_height);
		if let Some(metrics) = &self.metrics {
			metrics.set_last_scanned_height(&self.network, last_scanned_height);
		}
	}

	async fn scan_range(&self, heights: RangeInclusive<u64>) {
		for height in heights {
			let block = match self.client.get_block_results(height).await {
				Ok(block) => block,
				Err(e) => {
					warn!(
						"failed to retrieve the block result, height: {}, err: {}",
						height, e
					);
					self.record_failure(FailureKind::BlockResults);
					continue;
				}
			};

			for event in classify_block(&block, &self.providers) {
				self.report_slash(height, &event);
			}
		}
	}

	async fn check_balances(&self, threshold: u128) {
		let mut providers: Vec<&String> = self.providers.iter().collect();
		providers.sort_unstable();

		for address in providers {
			let balance = match self.client.get_balance(address).await {
				Ok(balance) => balance,
				Err(e) => {
					error!(address = %address, "failed to query balance, err: {}", e);
					self.record_failure(FailureKind::Balance);
					continue;
				}
			};

			if is_at_or_below_threshold(&balance, threshold) {
				self.report(&format!("balance of address({}) is almost empty!", address));
			}
		}
	}

	fn report_slash(&self, height: u64, event: &SlashEvent) {
		let message = event.alert_message();
		warn!(
			height,
			provider = %event.provider,
			request_id = %event.request_id,
			"{}",
			message
		);
		if let Some(metrics) = &self.metrics {
			metrics.record_alert(&self.network, &message);
		}
	}

	fn report(&self, message: &str) {
		warn!("{}", message);
		if let Some(metrics) = &self.metrics {
			metrics.record_alert(&self.network, message);
		}
	}

	fn record_failure(&self, kind: FailureKind) {
		if let Some(metrics) = &self.metrics {
			metrics.record_fetch_failure(&self.network, kind);
		}
	}
}
