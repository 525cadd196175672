//! Provider slash monitor.
//!
//! Watches Cosmos SDK based chains for slash events raised against a set of
//! service providers and for provider balances running low. Every finding is
//! logged and exported as a Prometheus counter.
//!
//! # Modules
//! - `bootstrap`: Builds monitors from configuration
//! - `models`: Configuration and chain data types
//! - `services`: Chain clients, classification and the poll loop
//! - `utils`: Logging and metrics

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
