//! Block watcher service implementation.
//!
//! Provides the provider monitor, which polls a chain for new heights, reports
//! slash events against watched providers and checks their balances.

mod error;
mod service;

pub use error::BlockWatcherError;
pub use service::{MonitorStatus, ProviderMonitor};
