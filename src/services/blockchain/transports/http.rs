//! HTTP transport implementation for node interactions.
//!
//! This module provides a generic HTTP client for talking to a single node
//! endpoint, supporting:
//! - JSON-RPC 2.0 requests (Tendermint RPC)
//! - Plain JSON `GET` requests (gRPC gateway)
//! - Retries with exponential backoff on transient failures
//! - Request and connect timeouts

use anyhow::Context;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use serde_json::{json, Value};
use std::{
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};
use url::Url;

use crate::{models::Endpoint, services::blockchain::BlockChainError};

/// HTTP transport client bound to one node endpoint
///
/// The client is cheap to clone and can be shared across tasks.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	client: ClientWithMiddleware,
	endpoint: Endpoint,
	next_request_id: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Creates a new HTTP transport client for `endpoint`
	///
	/// No connection is attempted here; an unreachable node surfaces as a
	/// [`BlockChainError::ConnectionError`] on the first request.
	///
	/// # Arguments
	/// * `endpoint` - Node endpoint all requests are sent to
	/// * `max_retries` - Retries for transient failures (connection errors, 5xx, 429)
	pub fn new(endpoint: Endpoint, max_retries: u32) -> Result<Self, anyhow::Error> {
		let retry_policy = ExponentialBackoff::builder()
			.base(2)
			.retry_bounds(Duration::from_millis(250), Duration::from_secs(10))
			.jitter(Jitter::Full)
			.build_with_max_retries(max_retries);

		let http_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(8)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create HTTP client")?;

		let client = ClientBuilder::new(http_client)
			.with(RetryTransientMiddleware::new_with_policy(retry_policy))
			.build();

		Ok(Self {
			client,
			endpoint,
			next_request_id: Arc::new(AtomicU64::new(1)),
		})
	}

	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// Sends a JSON-RPC 2.0 request and returns its `result` member
	///
	/// JSON-RPC error objects are turned into [`BlockChainError::RequestError`]
	/// carrying the node's code, message and data.
	pub async fn send_raw_request(
		&self,
		method: &str,
		params: Value,
	) -> Result<Value, BlockChainError> {
		let request_body = json!({
			"jsonrpc": "2.0",
			"id": self.next_request_id.fetch_add(1, Ordering::Relaxed),
			"method": method,
			"params": params,
		});

		let response = self
			.client
			.post(self.endpoint.url().clone())
			.json(&request_body)
			.send()
			.await?;

		let status = response.status();
		let text = response.text().await?;

		let body: Value = match serde_json::from_str(&text) {
			Ok(body) => body,
			Err(_) if !status.is_success() => {
				return Err(BlockChainError::request_error(format!(
					"{} returned HTTP {} for '{}': {}",
					self.endpoint, status, method, text
				)));
			}
			Err(e) => return Err(e.into()),
		};

		if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
			return Err(BlockChainError::request_error(format!(
				"JSON-RPC error for '{}': code {}, {} {}",
				method,
				error.get("code").unwrap_or(&Value::Null),
				error
					.get("message")
					.and_then(Value::as_str)
					.unwrap_or_default(),
				error.get("data").and_then(Value::as_str).unwrap_or_default(),
			)));
		}

		body.get("result").cloned().ok_or_else(|| {
			BlockChainError::request_error(format!(
				"JSON-RPC response for '{}' has no result",
				method
			))
		})
	}

	/// Sends a `GET` request to `path` below the endpoint URL and decodes the JSON body
	pub async fn get_json(
		&self,
		path: &[&str],
		query: &[(&str, &str)],
	) -> Result<Value, BlockChainError> {
		let url = self.url_for(path)?;

		let response = self.client.get(url).query(query).send().await?;

		let status = response.status();
		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			return Err(BlockChainError::request_error(format!(
				"{} returned HTTP {} for '/{}': {}",
				self.endpoint,
				status,
				path.join("/"),
				text
			)));
		}

		Ok(response.json::<Value>().await?)
	}

	fn url_for(&self, path: &[&str]) -> Result<Url, BlockChainError> {
		let mut url = self.endpoint.url().clone();
		url.path_segments_mut()
			.map_err(|_| {
				BlockChainError::internal_error(format!(
					"endpoint {} cannot be used as a base URL",
					self.endpoint
				))
			})?
			.pop_if_empty()
			.extend(path);
		Ok(url)
	}
}
