mod balance;
mod block;
mod endpoint;
mod slash;

pub use balance::Coin;
pub use block::{AbciEvent, AttributeEncoding, BlockResults, EventAttribute, TxResult};
pub use endpoint::{Endpoint, EndpointKind};
pub use slash::{SlashCause, SlashEvent};
