use serde::{Deserialize, Serialize};

/// An amount of a single denomination held by an account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Coin {
	pub denom: String,
	pub amount: u128,
}

impl Coin {
	pub fn new(denom: impl Into<String>, amount: u128) -> Self {
		Self {
			denom: denom.into(),
			amount,
		}
	}
}
