//! Domain models and data structures for provider monitoring.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (endpoints, block results, balances, slash events)

mod config;
mod core;

// Re-export core types
pub use core::{
	AbciEvent, AttributeEncoding, BlockResults, Coin, Endpoint, EndpointKind, EventAttribute,
	SlashCause, SlashEvent, TxResult,
};

// Re-export config types
pub use config::{BalanceConfig, ConfigError, ConfigLoader, MonitorConfig, NetworkConfig};
