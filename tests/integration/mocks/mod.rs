//! Mock implementations for testing purposes.
//!
//! This module contains mock implementations of the infrastructure ports,
//! primarily for testing without real network access. It includes:
//! - [`MockHttp`] - mockall-based mock of the HTTP port
//! - [`SyntheticProvider`] - a deterministic Etherscan-shaped provider with a
//!   configurable record distribution, used by the aggregator tests
//! - [`CaptureTelemetry`] - a telemetry sink recording events for assertions

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chainscan::services::{
	telemetry::{CallEvent, Telemetry},
	transport::{HttpClient, HttpResponse, TransportError},
};

mock! {
	pub Http {}

	#[async_trait]
	impl HttpClient for Http {
		async fn get(
			&self,
			url: &str,
			query: &[(String, String)],
			headers: &[(String, String)],
		) -> Result<HttpResponse, TransportError>;

		async fn post<'a>(
			&self,
			url: &'a str,
			query: &'a [(String, String)],
			headers: &'a [(String, String)],
			body: Option<&'a Value>,
		) -> Result<HttpResponse, TransportError>;
	}
}

/// Telemetry sink that records every event for later assertions.
#[derive(Default)]
pub struct CaptureTelemetry {
	events: Mutex<Vec<CallEvent>>,
}

impl CaptureTelemetry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> Vec<CallEvent> {
		self.events.lock().unwrap().clone()
	}
}

impl Telemetry for CaptureTelemetry {
	fn record_call(&self, event: &CallEvent) {
		self.events.lock().unwrap().push(event.clone());
	}
}

/// One request the synthetic provider served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServedRequest {
	pub start: u64,
	pub end: u64,
	pub page: u64,
	pub offset: usize,
}

/// A deterministic Etherscan-shaped provider backed by a record distribution.
///
/// Serves `txlist`-style requests from a per-block record count map, honoring
/// `startblock`/`endblock`/`page`/`offset` exactly the way the real API does,
/// and answers proxy `eth_getBlockByNumber` with the highest populated block.
/// Tracks request logs and the in-flight high-water mark for concurrency
/// assertions.
pub struct SyntheticProvider {
	records_per_block: BTreeMap<u64, usize>,
	delay: Option<Duration>,
	fail_when: Option<Box<dyn Fn(u64, u64) -> bool + Send + Sync>>,
	requests: Mutex<Vec<ServedRequest>>,
	in_flight: AtomicUsize,
	max_in_flight: AtomicUsize,
	max_served: AtomicUsize,
}

impl SyntheticProvider {
	pub fn new(records_per_block: BTreeMap<u64, usize>) -> Self {
		Self {
			records_per_block,
			delay: None,
			fail_when: None,
			requests: Mutex::new(Vec::new()),
			in_flight: AtomicUsize::new(0),
			max_in_flight: AtomicUsize::new(0),
			max_served: AtomicUsize::new(0),
		}
	}

	/// Adds latency to every request so tests can observe overlap
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	/// Fails every request whose block range matches the predicate
	pub fn failing_when(
		mut self,
		predicate: impl Fn(u64, u64) -> bool + Send + Sync + 'static,
	) -> Self {
		self.fail_when = Some(Box::new(predicate));
		self
	}

	/// All requests served so far
	pub fn requests(&self) -> Vec<ServedRequest> {
		self.requests.lock().unwrap().clone()
	}

	/// Highest number of concurrently in-flight requests observed
	pub fn max_in_flight(&self) -> usize {
		self.max_in_flight.load(Ordering::SeqCst)
	}

	/// Largest page ever served
	pub fn max_served(&self) -> usize {
		self.max_served.load(Ordering::SeqCst)
	}

	/// The full expected record set over `[start, end]`, sorted
	pub fn expected_records(&self, start: u64, end: u64) -> Vec<Value> {
		self.records_in_range(start, end)
	}

	fn records_in_range(&self, start: u64, end: u64) -> Vec<Value> {
		self.records_per_block
			.range(start..=end)
			.flat_map(|(&block, &count)| {
				(0..count).map(move |index| synthetic_record(block, index))
			})
			.collect()
	}

	fn query_param(query: &[(String, String)], key: &str) -> Option<String> {
		query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.clone())
	}

	fn handle(&self, query: &[(String, String)]) -> HttpResponse {
		// Proxy tip resolution for open-ended harvests
		if Self::query_param(query, "action").as_deref() == Some("eth_getBlockByNumber") {
			let tip = self.records_per_block.keys().last().copied().unwrap_or(0);
			return HttpResponse {
				status: 200,
				body: json!({
					"jsonrpc": "2.0",
					"id": 1,
					"result": {"number": format!("0x{:x}", tip)}
				})
				.to_string(),
			};
		}

		let start = Self::query_param(query, "startblock")
			.and_then(|v| v.parse().ok())
			.unwrap_or(0u64);
		let end = Self::query_param(query, "endblock")
			.and_then(|v| v.parse().ok())
			.unwrap_or(u64::MAX);
		let page: u64 = Self::query_param(query, "page")
			.and_then(|v| v.parse().ok())
			.unwrap_or(1);
		let offset: usize = Self::query_param(query, "offset")
			.and_then(|v| v.parse().ok())
			.unwrap_or(10_000);

		self.requests.lock().unwrap().push(ServedRequest {
			start,
			end,
			page,
			offset,
		});

		if let Some(fail_when) = &self.fail_when {
			if fail_when(start, end) {
				return HttpResponse {
					status: 503,
					body: "synthetic backend unavailable".to_string(),
				};
			}
		}

		let all = self.records_in_range(start, end);
		let from = ((page - 1) as usize).saturating_mul(offset);
		let slice: Vec<Value> = all.into_iter().skip(from).take(offset).collect();
		self.max_served.fetch_max(slice.len(), Ordering::SeqCst);

		let body = if slice.is_empty() {
			json!({"status": "0", "message": "No transactions found", "result": []})
		} else {
			json!({"status": "1", "message": "OK", "result": slice})
		};
		HttpResponse {
			status: 200,
			body: body.to_string(),
		}
	}
}

/// Builds the record for (block, index); numeric encodings alternate between
/// decimal and hex so ordering must compare numerically
pub fn synthetic_record(block: u64, index: usize) -> Value {
	let block_encoded = if (block + index as u64) % 2 == 0 {
		block.to_string()
	} else {
		format!("0x{:x}", block)
	};
	json!({
		"hash": format!("0x{:012x}{:04x}", block, index),
		"blockNumber": block_encoded,
		"transactionIndex": index.to_string(),
		"from": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
		"value": "1",
	})
}

#[async_trait]
impl HttpClient for SyntheticProvider {
	async fn get(
		&self,
		_url: &str,
		query: &[(String, String)],
		_headers: &[(String, String)],
	) -> Result<HttpResponse, TransportError> {
		let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_in_flight.fetch_max(current, Ordering::SeqCst);

		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		let response = self.handle(query);

		self.in_flight.fetch_sub(1, Ordering::SeqCst);
		Ok(response)
	}

	async fn post<'a>(
		&self,
		_url: &'a str,
		query: &'a [(String, String)],
		_headers: &'a [(String, String)],
		_body: Option<&'a Value>,
	) -> Result<HttpResponse, TransportError> {
		Ok(self.handle(query))
	}
}
