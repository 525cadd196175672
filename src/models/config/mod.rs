//! Configuration loading and validation.
//!
//! The monitor is configured from a single JSON file describing the metrics
//! listener, the balance threshold and one entry per watched network.

use std::path::Path;

mod error;
mod monitor_config;

pub use error::ConfigError;
pub use monitor_config::{BalanceConfig, MonitorConfig, NetworkConfig};

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
