//! Blockchain client interfaces and implementations.
//!
//! Provides the capability surface the monitor needs from a chain and its
//! implementation for Tendermint/Cosmos SDK nodes. Includes:
//!
//! - Generic chain client trait
//! - Cosmos SDK client
//! - HTTP transport with transient-error retries
//! - Error handling for blockchain operations

mod client;
mod clients;
mod error;
mod transports;

pub use client::ChainClient;
pub use clients::CosmosClient;
pub use error::BlockChainError;
pub use transports::HttpTransportClient;
