use serde::{Deserialize, Serialize};

/// Encoding of event attribute keys and values as reported by the node.
///
/// Tendermint 0.34 nodes return attributes base64 encoded, later releases
/// return them as plain strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeEncoding {
	#[default]
	Plain,
	Base64,
}

/// A single key/value attribute of an ABCI event
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventAttribute {
	pub key: String,
	pub value: String,
}

/// An ABCI event emitted while executing a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AbciEvent {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub attributes: Vec<EventAttribute>,
}

impl AbciEvent {
	pub fn new(kind: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
		Self {
			kind: kind.into(),
			attributes: attributes
				.iter()
				.map(|(key, value)| EventAttribute {
					key: key.to_string(),
					value: value.to_string(),
				})
				.collect(),
		}
	}
}

/// Execution result of one transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TxResult {
	#[serde(default)]
	pub events: Vec<AbciEvent>,
}

/// Execution results of the block at `height`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlockResults {
	pub height: u64,
	#[serde(default)]
	pub txs_results: Vec<TxResult>,
	/// Events emitted outside of any transaction at the end of the block
	#[serde(default)]
	pub end_block_events: Vec<AbciEvent>,
}
