use crate::properties::strategies::coins_strategy;

use provider_slash_monitor::{models::Coin, services::balance::is_at_or_below_threshold};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// A single denomination is compared against the threshold, inclusively
	#[test]
	fn test_single_denomination(amount in any::<u128>(), threshold in any::<u128>()) {
		prop_assert_eq!(
			is_at_or_below_threshold(&[Coin::new("uiris", amount)], threshold),
			amount <= threshold
		);
	}

	// Holding any amount of a second denomination keeps the balance above
	#[test]
	fn test_other_denomination_lifts_balance(
		amount in any::<u128>(),
		other in 1..=u128::MAX,
		threshold in any::<u128>()
	) {
		let balance = vec![Coin::new("uiris", amount), Coin::new("ustake", other)];
		prop_assert!(!is_at_or_below_threshold(&balance, threshold));
	}

	// Raising the threshold never turns a low balance into a healthy one
	#[test]
	fn test_monotonic_in_threshold(
		balance in coins_strategy(),
		threshold in any::<u128>(),
		raise in any::<u128>()
	) {
		let raised = threshold.saturating_add(raise);
		if is_at_or_below_threshold(&balance, threshold) {
			prop_assert!(is_at_or_below_threshold(&balance, raised));
		}
	}

	// An empty balance is low regardless of the threshold
	#[test]
	fn test_empty_balance(threshold in any::<u128>()) {
		prop_assert!(is_at_or_below_threshold(&[], threshold));
	}
}
