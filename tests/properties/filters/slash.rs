use std::collections::HashSet;

use crate::properties::strategies::{address_strategy, block_strategy};

use provider_slash_monitor::{
	models::SlashCause,
	services::filter::{attribute_value, classify_block, is_targeted_slash_event},
};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Only slash events against watched providers are reported
	#[test]
	fn test_reported_providers_are_watched(
		block in block_strategy(),
		providers in prop::collection::hash_set(address_strategy(), 0..4)
	) {
		for event in classify_block(&block, &providers) {
			prop_assert!(providers.contains(&event.provider));
		}
	}

	// One report per targeted event, with the cause given by its location
	#[test]
	fn test_cause_follows_event_location(
		block in block_strategy(),
		providers in prop::collection::hash_set(address_strategy(), 0..4)
	) {
		let tx_hits = block
			.txs_results
			.iter()
			.flat_map(|tx| tx.events.iter())
			.filter(|event| is_targeted_slash_event(event, &providers))
			.count();
		let block_hits = block
			.end_block_events
			.iter()
			.filter(|event| is_targeted_slash_event(event, &providers))
			.count();

		let causes: Vec<SlashCause> = classify_block(&block, &providers)
			.into_iter()
			.map(|event| event.cause)
			.collect();

		prop_assert_eq!(causes.len(), tx_hits + block_hits);
		prop_assert!(causes[..tx_hits].iter().all(|c| *c == SlashCause::InvalidResponse));
		prop_assert!(causes[tx_hits..].iter().all(|c| *c == SlashCause::Timeout));
	}

	// Request ids are copied verbatim, missing ones become empty
	#[test]
	fn test_request_ids_match_source_events(block in block_strategy()) {
		let providers: HashSet<String> = ["iaa1alpha", "iaa1beta", "iaa1gamma", "iaa1delta"]
			.iter()
			.map(|p| p.to_string())
			.collect();

		let expected: Vec<String> = block
			.txs_results
			.iter()
			.flat_map(|tx| tx.events.iter())
			.chain(block.end_block_events.iter())
			.filter(|event| is_targeted_slash_event(event, &providers))
			.map(|event| attribute_value(event, "request_id").unwrap_or_default().to_string())
			.collect();

		let actual: Vec<String> = classify_block(&block, &providers)
			.into_iter()
			.map(|event| event.request_id)
			.collect();

		prop_assert_eq!(actual, expected);
	}

	// Nothing is reported when no provider is watched
	#[test]
	fn test_empty_provider_set(block in block_strategy()) {
		prop_assert!(classify_block(&block, &HashSet::new()).is_empty());
	}
}
