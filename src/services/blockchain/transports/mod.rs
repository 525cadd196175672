//! Network transports used by the chain clients.

mod http;

pub use http::HttpTransportClient;
