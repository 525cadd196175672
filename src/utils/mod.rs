//! Utility modules for common functionality.
//!
//! - logging: Logging utilities
//! - metrics: Metrics sink and the Prometheus scrape endpoint

pub mod logging;
pub mod metrics;
