//! Balance threshold evaluation.

use crate::models::Coin;

/// Whether `balance` is at or below `threshold`.
///
/// The first-listed denomination is the comparison unit: its amount may be at
/// most `threshold`, while any other denomination must be zero for the
/// balance to count as at or below the threshold. An empty balance holds
/// nothing and is therefore at or below any threshold.
pub fn is_at_or_below_threshold(balance: &[Coin], threshold: u128) -> bool {
	let Some(unit) = balance.first() else {
		return true;
	};

	balance.iter().all(|coin| {
		let limit = if coin.denom == unit.denom { threshold } else { 0 };
		coin.amount <= limit
	})
}
