//! Event filtering functionality.
//!
//! Implements the classification of block events for monitoring provider
//! activity: which events are slash events against a watched provider, and
//! what caused them.

mod slash;

pub use slash::{
	attribute_value, classify_block, is_targeted_slash_event, PROVIDER_ATTRIBUTE,
	REQUEST_ID_ATTRIBUTE, SERVICE_SLASH_EVENT_TYPE,
};
