use std::collections::HashSet;

use crate::models::{AbciEvent, BlockResults, SlashCause, SlashEvent};

/// Event type emitted by the service module when a provider is slashed
pub const SERVICE_SLASH_EVENT_TYPE: &str = "service_slash";
pub const PROVIDER_ATTRIBUTE: &str = "provider";
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

/// Returns the value of the first attribute of `event` named `key`
pub fn attribute_value<'a>(event: &'a AbciEvent, key: &str) -> Option<&'a str> {
	event
		.attributes
		.iter()
		.find(|attribute| attribute.key == key)
		.map(|attribute| attribute.value.as_str())
}

/// Whether `event` is a slash event whose provider is one of `providers`
pub fn is_targeted_slash_event(event: &AbciEvent, providers: &HashSet<String>) -> bool {
	if event.kind != SERVICE_SLASH_EVENT_TYPE {
		return false;
	}

	attribute_value(event, PROVIDER_ATTRIBUTE)
		.map(|provider| providers.contains(provider))
		.unwrap_or(false)
}

/// Extracts every slash event against a watched provider from one block.
///
/// Transaction events come first, in transaction order, and are attributed to
/// an invalid response. End-of-block events follow and are attributed to a
/// response timeout.
pub fn classify_block(block: &BlockResults, providers: &HashSet<String>) -> Vec<SlashEvent> {
	let tx_events = block
		.txs_results
		.iter()
		.flat_map(|tx| tx.events.iter())
		.map(|event| (SlashCause::InvalidResponse, event));
	let block_events = block
		.end_block_events
		.iter()
		.map(|event| (SlashCause::Timeout, event));

	tx_events
		.chain(block_events)
		.filter(|(_, event)| is_targeted_slash_event(event, providers))
		.map(|(cause, event)| SlashEvent {
			cause,
			provider: attribute_value(event, PROVIDER_ATTRIBUTE)
				.unwrap_or_default()
				.to_string(),
			request_id: attribute_value(event, REQUEST_ID_ATTRIBUTE)
				.unwrap_or_default()
				.to_string(),
		})
		.collect()
}
