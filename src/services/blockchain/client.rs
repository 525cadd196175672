//! Core chain client interface.
//!
//! The monitor only depends on this capability surface, so tests and other
//! node implementations can stand in for the Cosmos client.

use async_trait::async_trait;

use crate::{
	models::{BlockResults, Coin},
	services::blockchain::BlockChainError,
};

/// Read-only access to a chain's progress, block results and balances
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Retrieves the latest committed block height
	async fn get_latest_height(&self) -> Result<u64, BlockChainError>;

	/// Retrieves the transaction and end-of-block events of the block at `height`
	async fn get_block_results(&self, height: u64) -> Result<BlockResults, BlockChainError>;

	/// Retrieves every denomination held by `address`, in the order reported by the node
	async fn get_balance(&self, address: &str) -> Result<Vec<Coin>, BlockChainError>;
}
