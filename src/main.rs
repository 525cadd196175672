//! Provider slash monitor entry point.
//!
//! Loads the configuration, starts one monitor per configured network along
//! with the Prometheus scrape endpoint, and stops every monitor on an
//! interrupt or termination signal.
//!
//! # Flow
//! 1. Parses CLI arguments and loads `.env`
//! 2. Sets up logging
//! 3. Loads and validates the configuration file
//! 4. Starts the metrics server and one poll loop per network
//! 5. Stops all monitors on Ctrl+C / SIGTERM and waits for them to finish

use provider_slash_monitor::{
	bootstrap::{initialize_monitors, Result},
	models::{ConfigLoader, MonitorConfig},
	utils::{
		logging::setup_logging,
		metrics::{server::create_metrics_server, MetricsSink, PrometheusMetrics},
	},
};

use clap::{Arg, Command};
use dotenvy::dotenv;
use std::{
	env::{set_var, var},
	path::Path,
	sync::Arc,
};
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Resolves once the process is asked to shut down
async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			error!("Error waiting for Ctrl+C: {}", e);
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				error!("Error installing SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {}
		_ = terminate => {}
	}
}

/// Main entry point for the provider slash monitor.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or a monitor cannot
/// be built.
#[tokio::main]
async fn main() -> Result<()> {
	let matches = Command::new("provider-slash-monitor")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Watches Cosmos SDK chains for slash events against service providers and for \
			 provider balances running low.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the configuration file (default: config/config.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("metrics-address")
				.long("metrics-address")
				.help("Address to start the metrics server on, overrides the configuration")
				.value_name("HOST:PORT"),
		)
		.arg(
			Arg::new("no-metrics")
				.long("no-metrics")
				.help("Disable the metrics server")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("once")
				.long("once")
				.help("Run a single scan cycle per network and exit")
				.action(clap::ArgAction::SetTrue),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let config_path = matches
		.get_one::<String>("config")
		.cloned()
		.or_else(|| var("CONFIG_PATH").ok())
		.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

	let config = MonitorConfig::load_from_path(Path::new(&config_path)).map_err(|e| {
		anyhow::anyhow!(
			"Failed to load configuration from {}: {}",
			config_path,
			e
		)
	})?;

	let run_once = matches.get_flag("once");

	let metrics = Arc::new(PrometheusMetrics::new()?);
	let sink: Arc<dyn MetricsSink> = metrics.clone();
	let monitors = initialize_monitors(&config, Some(sink))
		.map_err(|e| anyhow::anyhow!("Failed to initialize monitors: {}", e))?;

	if run_once {
		futures::future::join_all(monitors.iter().map(|monitor| monitor.process_cycle())).await;
		info!("Single scan cycle complete");
		return Ok(());
	}

	let metrics_address = if matches.get_flag("no-metrics") {
		None
	} else {
		matches
			.get_one::<String>("metrics-address")
			.cloned()
			.or_else(|| config.metrics_address.clone())
	};

	let metrics_server = match metrics_address {
		Some(address) => match create_metrics_server(address, metrics.clone()) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		},
		None => {
			info!("Metrics server disabled. Set metrics_address or --metrics-address to enable");
			None
		}
	};

	let handles: Vec<_> = monitors
		.iter()
		.cloned()
		.map(|monitor| tokio::spawn(async move { monitor.start().await }))
		.collect();

	info!("Service started. Press Ctrl+C to shutdown");

	if let Some(metrics_future) = metrics_server {
		tokio::select! {
			_ = shutdown_signal() => {
				info!("Shutdown signal received, stopping monitors...");
			}
			result = metrics_future => {
				if let Err(e) = result {
					error!("Metrics server error: {}", e);
				}
				info!("Metrics server stopped, stopping monitors...");
			}
		}
	} else {
		shutdown_signal().await;
		info!("Shutdown signal received, stopping monitors...");
	}

	for monitor in &monitors {
		monitor.stop();
	}

	for result in futures::future::join_all(handles).await {
		match result {
			Ok(Ok(())) => {}
			Ok(Err(e)) => error!("Monitor error during shutdown: {}", e),
			Err(e) => error!("Monitor task failed: {}", e),
		}
	}

	info!("Shutdown complete");
	Ok(())
}
