//! Cosmos SDK chain client.
//!
//! Chain progress and block results come from the Tendermint JSON-RPC
//! endpoint; balances come from the bank query service exposed by the node's
//! gRPC gateway.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::debug;

use crate::{
	models::{
		AbciEvent, AttributeEncoding, BlockResults, Coin, EventAttribute, NetworkConfig, TxResult,
	},
	services::blockchain::{BlockChainError, ChainClient, HttpTransportClient},
};

/// Maximum number of balance pages followed for a single account
const MAX_BALANCE_PAGES: usize = 16;

/// Chain client for Tendermint/Cosmos SDK nodes
#[derive(Clone, Debug)]
pub struct CosmosClient {
	rpc: HttpTransportClient,
	grpc: HttpTransportClient,
	attribute_encoding: AttributeEncoding,
}

impl CosmosClient {
	/// Creates a client for the endpoints of `network`
	pub fn new(network: &NetworkConfig) -> Result<Self, BlockChainError> {
		let rpc_endpoint = network
			.rpc()
			.map_err(|e| BlockChainError::internal_error(e.to_string()))?;
		let grpc_endpoint = network
			.grpc()
			.map_err(|e| BlockChainError::internal_error(e.to_string()))?;

		let rpc = HttpTransportClient::new(rpc_endpoint, network.max_retries)
			.map_err(|e| BlockChainError::internal_error(format!("{:#}", e)))?;
		let grpc = HttpTransportClient::new(grpc_endpoint, network.max_retries)
			.map_err(|e| BlockChainError::internal_error(format!("{:#}", e)))?;

		Ok(Self {
			rpc,
			grpc,
			attribute_encoding: network.attribute_encoding,
		})
	}

	fn decode_text(&self, raw: Option<String>) -> String {
		let raw = raw.unwrap_or_default();
		match self.attribute_encoding {
			AttributeEncoding::Plain => raw,
			AttributeEncoding::Base64 => STANDARD
				.decode(raw.as_bytes())
				.ok()
				.and_then(|bytes| String::from_utf8(bytes).ok())
				.unwrap_or_else(|| {
					debug!(attribute = %raw, "attribute is not valid base64, keeping raw value");
					raw
				}),
		}
	}

	fn convert_events(&self, events: Option<Vec<RawEvent>>) -> Vec<AbciEvent> {
		events
			.unwrap_or_default()
			.into_iter()
			.map(|event| AbciEvent {
				kind: event.kind,
				attributes: event
					.attributes
					.unwrap_or_default()
					.into_iter()
					.map(|attribute| EventAttribute {
						key: self.decode_text(attribute.key),
						value: self.decode_text(attribute.value),
					})
					.collect(),
			})
			.collect()
	}

	fn convert_block_results(&self, raw: RawBlockResults) -> BlockResults {
		let txs_results = raw
			.txs_results
			.unwrap_or_default()
			.into_iter()
			.map(|tx| TxResult {
				events: self.convert_events(tx.events),
			})
			.collect();

		// CometBFT 0.38 reports block-level events as finalize_block_events
		let mut end_block_events = self.convert_events(raw.end_block_events);
		end_block_events.extend(self.convert_events(raw.finalize_block_events));

		BlockResults {
			height: raw.height,
			txs_results,
			end_block_events,
		}
	}
}

#[async_trait]
impl ChainClient for CosmosClient {
	async fn get_latest_height(&self) -> Result<u64, BlockChainError> {
		let result = self.rpc.send_raw_request("status", json!({})).await?;
		let status: RawStatus = serde_json::from_value(result)?;
		Ok(status.sync_info.latest_block_height)
	}

	async fn get_block_results(&self, height: u64) -> Result<BlockResults, BlockChainError> {
		let result = self
			.rpc
			.send_raw_request("block_results", json!({ "height": height.to_string() }))
			.await
			.map_err(|e| match e {
				BlockChainError::RequestError(msg) if is_missing_height_error(&msg) => {
					BlockChainError::block_not_found(height)
				}
				other => other,
			})?;

		let raw: RawBlockResults = serde_json::from_value(result)?;
		Ok(self.convert_block_results(raw))
	}

	async fn get_balance(&self, address: &str) -> Result<Vec<Coin>, BlockChainError> {
		let path = ["cosmos", "bank", "v1beta1", "balances", address];
		let mut coins = Vec::new();
		let mut next_key: Option<String> = None;

		for _ in 0..MAX_BALANCE_PAGES {
			let query: Vec<(&str, &str)> = next_key
				.as_deref()
				.map(|key| vec![("pagination.key", key)])
				.unwrap_or_default();

			let result = self.grpc.get_json(&path, &query).await?;
			let page: RawBalances = serde_json::from_value(result)?;

			for coin in page.balances {
				let amount = coin.amount.parse::<u128>().map_err(|e| {
					BlockChainError::request_error(format!(
						"invalid amount '{}' for denom '{}' of {}: {}",
						coin.amount, coin.denom, address, e
					))
				})?;
				coins.push(Coin::new(coin.denom, amount));
			}

			next_key = page
				.pagination
				.and_then(|pagination| pagination.next_key)
				.filter(|key| !key.is_empty());
			if next_key.is_none() {
				return Ok(coins);
			}
		}

		Err(BlockChainError::request_error(format!(
			"balance of {} spans more than {} pages",
			address, MAX_BALANCE_PAGES
		)))
	}
}

fn is_missing_height_error(message: &str) -> bool {
	message.contains("must be less than or equal to the current blockchain height")
		|| message.contains("could not find results for height")
		|| message.contains("is not available, lowest height is")
}

/// Tendermint encodes 64-bit integers as JSON strings
fn u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum StringOrNumber {
		String(String),
		Number(u64),
	}

	match StringOrNumber::deserialize(deserializer)? {
		StringOrNumber::String(s) => s.parse().map_err(serde::de::Error::custom),
		StringOrNumber::Number(n) => Ok(n),
	}
}

#[derive(Deserialize)]
struct RawStatus {
	sync_info: RawSyncInfo,
}

#[derive(Deserialize)]
struct RawSyncInfo {
	#[serde(deserialize_with = "u64_from_string")]
	latest_block_height: u64,
}

#[derive(Deserialize)]
struct RawBlockResults {
	#[serde(deserialize_with = "u64_from_string")]
	height: u64,
	#[serde(default)]
	txs_results: Option<Vec<RawTxResult>>,
	#[serde(default)]
	end_block_events: Option<Vec<RawEvent>>,
	#[serde(default)]
	finalize_block_events: Option<Vec<RawEvent>>,
}

#[derive(Deserialize)]
struct RawTxResult {
	#[serde(default)]
	events: Option<Vec<RawEvent>>,
}

#[derive(Deserialize)]
struct RawEvent {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default)]
	attributes: Option<Vec<RawAttribute>>,
}

#[derive(Deserialize)]
struct RawAttribute {
	#[serde(default)]
	key: Option<String>,
	#[serde(default)]
	value: Option<String>,
}

#[derive(Deserialize)]
struct RawBalances {
	#[serde(default)]
	balances: Vec<RawCoin>,
	#[serde(default)]
	pagination: Option<RawPagination>,
}

#[derive(Deserialize)]
struct RawCoin {
	denom: String,
	amount: String,
}

#[derive(Deserialize)]
struct RawPagination {
	#[serde(default)]
	next_key: Option<String>,
}
