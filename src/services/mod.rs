//! Core services implementing the monitoring functionality.
//!
//! - balance: Low balance evaluation
//! - blockchain: Chain client trait and the Cosmos SDK implementation
//! - blockwatcher: Per-network poll loop
//! - filter: Slash event classification

pub mod balance;
pub mod blockchain;
pub mod blockwatcher;
pub mod filter;
