//! Range-splitting harvester implementation.
//!
//! Collects every record matching an address over a block interval despite
//! the provider's hard per-page ceiling. Pending sub-ranges sit in a priority
//! queue, largest first; a bounded set of workers fetches the first page of
//! each. A saturated page over more than one block means the range may be
//! truncated, so it is bisected and re-fetched; a saturated single block
//! falls back to page-based pagination, the only place pagination is used.

use serde_json::Value;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, instrument};

use crate::{
	models::{CallParams, LogicalMethod},
	services::{
		aggregator::{
			error::AggregatorError,
			range::FetchRange,
			record::dedup_and_sort,
		},
		client::{ChainscanClient, ClientError},
		scanner::ScannerError,
	},
	utils::parse_quantity,
};

/// End-block snapshot used when the chain tip cannot be resolved
const FALLBACK_END_BLOCK: u64 = 99_999_999;

/// How sub-range failures affect the harvest as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
	/// Abort the harvest on the first permanently failed sub-range
	#[default]
	Strict,
	/// Record the failure, skip the sub-range and continue
	Lenient,
}

/// Tuning knobs for a harvest
#[derive(Debug, Clone)]
pub struct HarvestConfig {
	/// Maximum number of requests in flight at once
	pub max_concurrency: usize,
	/// The provider's per-page row ceiling
	pub page_ceiling: usize,
	/// Failure handling mode
	pub failure_mode: FailureMode,
}

impl Default for HarvestConfig {
	fn default() -> Self {
		Self {
			max_concurrency: 4,
			page_ceiling: 10_000,
			failure_mode: FailureMode::Strict,
		}
	}
}

/// One harvest invocation.
#[derive(Debug, Clone)]
pub struct HarvestRequest {
	/// The range-scoped logical method to drive
	pub method: LogicalMethod,
	/// Address whose records are collected
	pub address: String,
	/// First block of the interval, inclusive
	pub start_block: u64,
	/// Last block of the interval, inclusive; None means the chain tip,
	/// resolved once when the harvest starts
	pub end_block: Option<u64>,
	/// Extra logical parameters forwarded to every call (topic filters,
	/// contract address)
	pub params: CallParams,
	/// Cooperative cancellation signal; flipping it to true stops scheduling
	/// and aborts in-flight work
	pub shutdown: Option<watch::Receiver<bool>>,
}

impl HarvestRequest {
	pub fn new(method: LogicalMethod, address: impl Into<String>) -> Self {
		Self {
			method,
			address: address.into(),
			start_block: 0,
			end_block: None,
			params: CallParams::new(),
			shutdown: None,
		}
	}

	/// Restricts the harvest to an inclusive block interval
	pub fn blocks(mut self, start: u64, end: u64) -> Self {
		self.start_block = start;
		self.end_block = Some(end);
		self
	}

	/// Attaches extra logical parameters
	pub fn params(mut self, params: CallParams) -> Self {
		self.params = params;
		self
	}

	/// Attaches a cancellation signal
	pub fn shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
		self.shutdown = Some(shutdown);
		self
	}
}

/// A sub-range that failed permanently in lenient mode
#[derive(Debug, Clone)]
pub struct RangeFailure {
	pub range: FetchRange,
	pub error: String,
}

/// Counters describing how a harvest ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
	/// Requests issued, including discarded saturated pages
	pub requests: u64,
	/// Sub-ranges bisected
	pub splits: u64,
	/// Pagination continuation pages fetched inside saturated single blocks
	pub pages: u64,
	/// Records received before deduplication
	pub records_fetched: u64,
}

/// The outcome of a harvest.
///
/// `canceled` distinguishes a partial result cut short by the shutdown signal
/// from a complete one; a canceled harvest is never silently complete.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
	/// Deduplicated records in (block, tx index, log index) order
	pub records: Vec<Value>,
	/// Per-range failures absorbed in lenient mode
	pub failures: Vec<RangeFailure>,
	/// True when the shutdown signal ended the harvest early
	pub canceled: bool,
	/// Run counters
	pub stats: HarvestStats,
}

/// What one worker learned about its sub-range
enum RangeOutcome {
	/// The range is exhaustively covered
	Done {
		range: FetchRange,
		records: Vec<Value>,
		requests: u64,
		pages: u64,
	},
	/// The first page saturated over a multi-block range; re-fetch the halves
	Split { parent: FetchRange, requests: u64 },
	/// The call failed permanently
	Failed {
		range: FetchRange,
		error: ClientError,
		requests: u64,
	},
}

/// Bulk harvester over a unified client.
#[derive(Clone)]
pub struct RangeHarvester {
	client: Arc<ChainscanClient>,
	config: HarvestConfig,
}

impl RangeHarvester {
	pub fn new(client: Arc<ChainscanClient>, config: HarvestConfig) -> Self {
		Self { client, config }
	}

	/// Collects every record matching the request over its block interval.
	///
	/// The result equals what an idealized unbounded single query would
	/// return: deduplicated, sorted, with no gaps introduced by the page
	/// ceiling. The method holds no state between invocations and may be
	/// re-run safely.
	#[instrument(
		skip(self, request),
		fields(
			method = %request.method,
			address = %request.address,
			start_block = request.start_block,
		)
	)]
	pub async fn harvest(
		&self,
		request: HarvestRequest,
	) -> Result<HarvestReport, AggregatorError> {
		if !request.method.is_range_scoped() {
			return Err(AggregatorError::unsupported_method(format!(
				"method '{}' does not return block-range-scoped records",
				request.method
			)));
		}

		let end_block = match request.end_block {
			Some(end) => end,
			None => self.resolve_end_block().await,
		};
		if request.start_block > end_block {
			return Err(AggregatorError::invalid_range(format!(
				"start block {} is after end block {}",
				request.start_block, end_block
			)));
		}

		let mut shutdown = request.shutdown.clone();
		if let Some(rx) = &shutdown {
			if *rx.borrow() {
				return Ok(HarvestReport {
					canceled: true,
					..HarvestReport::default()
				});
			}
		}

		let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
		let mut queue: BinaryHeap<FetchRange> = BinaryHeap::new();
		queue.push(FetchRange::new(request.start_block, end_block));

		let mut workers: JoinSet<RangeOutcome> = JoinSet::new();
		let mut report = HarvestReport::default();
		let mut records: Vec<Value> = Vec::new();
		let mut completed: Vec<FetchRange> = Vec::new();
		let mut strict_failure: Option<(FetchRange, ClientError)> = None;

		loop {
			// Top up the worker set from the queue, largest range first. The
			// worker-set bound keeps at most `max_concurrency` requests in
			// flight; the semaphore fronts the rate limiter inside each task.
			while workers.len() < self.config.max_concurrency {
				let Some(range) = queue.pop() else {
					break;
				};
				workers.spawn(run_range(
					self.client.clone(),
					semaphore.clone(),
					request.method,
					request.address.clone(),
					request.params.clone(),
					range,
					self.config.page_ceiling,
				));
			}
			if workers.is_empty() {
				break;
			}

			let mut sender_gone = false;
			let joined = match shutdown.as_mut() {
				Some(rx) => {
					tokio::select! {
						joined = workers.join_next() => Some(joined),
						changed = rx.changed() => {
							match changed {
								Ok(()) if *rx.borrow() => {
									report.canceled = true;
								}
								Ok(()) => {}
								Err(_) => sender_gone = true,
							}
							None
						}
					}
				}
				None => Some(workers.join_next().await),
			};
			if sender_gone {
				shutdown = None;
			}

			if report.canceled {
				break;
			}
			let Some(joined) = joined else {
				continue;
			};

			match joined {
				Some(Ok(outcome)) => {
					match outcome {
						RangeOutcome::Done {
							range,
							records: batch,
							requests,
							pages,
						} => {
							report.stats.requests += requests;
							report.stats.pages += pages;
							report.stats.records_fetched += batch.len() as u64;
							records.extend(batch);
							completed.push(range);
						}
						RangeOutcome::Split { parent, requests } => {
							report.stats.requests += requests;
							report.stats.splits += 1;
							let (left, right) = parent.split();
							debug!(parent = %parent, left = %left, right = %right, "splitting saturated range");
							queue.push(left);
							queue.push(right);
						}
						RangeOutcome::Failed {
							range,
							error,
							requests,
						} => {
							report.stats.requests += requests;
							match self.config.failure_mode {
								FailureMode::Strict => {
									strict_failure = Some((range, error));
								}
								FailureMode::Lenient => {
									report.failures.push(RangeFailure {
										range,
										error: error.to_string(),
									});
								}
							}
						}
					}
					if strict_failure.is_some() {
						break;
					}
				}
				Some(Err(join_error)) => {
					if join_error.is_panic() {
						std::panic::resume_unwind(join_error.into_panic());
					}
				}
				None => break,
			}
		}

		// Stop scheduling and abort whatever is still in flight; aborted
		// workers release their semaphore permits on drop.
		workers.shutdown().await;

		if let Some((failed, error)) = strict_failure {
			return Err(AggregatorError::partial_harvest(
				completed,
				failed,
				Box::new(error),
			));
		}

		report.records = dedup_and_sort(request.method, records);
		Ok(report)
	}

	/// Snapshots the chain tip for open-ended harvests.
	///
	/// Resolution failures fall back to a block number beyond any current
	/// chain rather than failing the harvest.
	async fn resolve_end_block(&self) -> u64 {
		let params = CallParams::new().with("block_number", "latest");
		match self.client.call(LogicalMethod::BlockByNumber, params).await {
			Ok(block) => block
				.get("number")
				.and_then(parse_quantity)
				.unwrap_or(FALLBACK_END_BLOCK),
			Err(_) => FALLBACK_END_BLOCK,
		}
	}
}

/// Processes one sub-range to a terminal outcome.
///
/// Issues the first page; fewer rows than the ceiling means the range is
/// covered. A saturated page over a multi-block range requests a split and
/// discards the page. A saturated single block paginates until a short page,
/// bounded by the block's own record count.
async fn run_range(
	client: Arc<ChainscanClient>,
	semaphore: Arc<Semaphore>,
	method: LogicalMethod,
	address: String,
	extra: CallParams,
	range: FetchRange,
	page_ceiling: usize,
) -> RangeOutcome {
	let mut records: Vec<Value> = Vec::new();
	let mut page: u64 = 1;
	let mut requests: u64 = 0;

	loop {
		let params = extra
			.clone()
			.with("address", address.clone())
			.with("start_block", range.start)
			.with("end_block", range.end)
			.with("page", page)
			.with("offset", page_ceiling as u64)
			.with("sort", "asc");

		let result = {
			// Permit held only for the duration of one request
			let _permit = semaphore.acquire().await;
			client.call(method, params).await
		};
		requests += 1;

		let batch = match result {
			Ok(Value::Array(batch)) => batch,
			Ok(other) => {
				return RangeOutcome::Failed {
					range,
					error: ScannerError::parse(
						format!(
							"expected an array of records for {}, got: {}",
							method,
							truncated(&other)
						),
						None,
						None,
					)
					.into(),
					requests,
				};
			}
			Err(error) => {
				return RangeOutcome::Failed {
					range,
					error,
					requests,
				};
			}
		};

		let saturated = batch.len() >= page_ceiling;
		if saturated && !range.is_single_block() {
			// The page may be truncated mid-range; it must be discarded and
			// re-fetched in the halves
			return RangeOutcome::Split {
				parent: range,
				requests,
			};
		}

		records.extend(batch);
		if !saturated {
			return RangeOutcome::Done {
				range,
				records,
				requests,
				pages: page.saturating_sub(1),
			};
		}

		// Saturated single block: the only pagination path, bounded by the
		// block's record count
		page += 1;
	}
}

fn truncated(value: &Value) -> String {
	let rendered = value.to_string();
	if rendered.len() > 120 {
		format!("{}...", &rendered[..120])
	} else {
		rendered
	}
}
