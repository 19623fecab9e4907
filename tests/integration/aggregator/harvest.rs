use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use chainscan::{
	models::LogicalMethod,
	services::{
		aggregator::{
			AggregatorError, FailureMode, FetchRange, HarvestConfig, HarvestRequest,
			RangeHarvester,
		},
		client::ChainscanClient,
		ratelimit::UnlimitedRateLimiter,
		telemetry::NoopTelemetry,
	},
	utils::parse_quantity,
};

use crate::integration::mocks::SyntheticProvider;

const ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

fn synthetic_client(provider: Arc<SyntheticProvider>) -> Arc<ChainscanClient> {
	Arc::new(
		ChainscanClient::builder("etherscan", "v2")
			.chain(1u64)
			.api_key("TESTKEY")
			.http(provider)
			.rate_limiter(Arc::new(UnlimitedRateLimiter))
			.telemetry(Arc::new(NoopTelemetry))
			.build()
			.unwrap(),
	)
}

fn harvester(provider: Arc<SyntheticProvider>, config: HarvestConfig) -> RangeHarvester {
	RangeHarvester::new(synthetic_client(provider), config)
}

fn sort_keys(records: &[serde_json::Value]) -> Vec<(u64, u64)> {
	records
		.iter()
		.map(|r| {
			(
				parse_quantity(r.get("blockNumber").unwrap()).unwrap(),
				parse_quantity(r.get("transactionIndex").unwrap()).unwrap(),
			)
		})
		.collect()
}

/// 350 records peaking in blocks [500, 600] over [0, 1000] with a page
/// ceiling of 100: the dense band must be bisected, every response stays
/// under the ceiling, and the result is exactly the expected set.
#[tokio::test]
async fn test_bisection_collects_dense_band_exactly() {
	let mut density = BTreeMap::new();
	for (index, block) in (500..=600).enumerate() {
		density.insert(block, if index < 47 { 4 } else { 3 });
	}
	let provider = Arc::new(SyntheticProvider::new(density));

	let harvester = harvester(
		provider.clone(),
		HarvestConfig {
			max_concurrency: 8,
			page_ceiling: 100,
			failure_mode: FailureMode::Strict,
		},
	);

	let report = harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 1000))
		.await
		.unwrap();

	assert_eq!(report.records.len(), 350);
	assert_eq!(report.records, provider.expected_records(0, 1000));
	assert!(report.stats.splits >= 1, "dense band must force a split");
	assert!(
		provider.max_served() <= 100,
		"no response may exceed the page ceiling"
	);

	let keys = sort_keys(&report.records);
	let mut sorted = keys.clone();
	sorted.sort();
	assert_eq!(keys, sorted, "records must be ordered by (block, tx index)");
}

/// A single block holding 250 records with a ceiling of 100: the range
/// narrows to that block, then pagination fetches pages 2 and 3.
#[tokio::test]
async fn test_single_block_overflow_falls_back_to_pagination() {
	let provider = Arc::new(SyntheticProvider::new(BTreeMap::from([(777u64, 250usize)])));

	let harvester = harvester(
		provider.clone(),
		HarvestConfig {
			max_concurrency: 4,
			page_ceiling: 100,
			failure_mode: FailureMode::Strict,
		},
	);

	let report = harvester
		.harvest(
			HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(770, 780),
		)
		.await
		.unwrap();

	assert_eq!(report.records.len(), 250);
	assert_eq!(report.records, provider.expected_records(770, 780));
	assert_eq!(report.stats.pages, 2, "pages 2 and 3 continue the block");

	let requests = provider.requests();
	assert!(requests
		.iter()
		.any(|r| r.start == 777 && r.end == 777 && r.page == 2));
	assert!(requests
		.iter()
		.any(|r| r.start == 777 && r.end == 777 && r.page == 3));
}

/// The harvest equals the idealized unbounded query for every page ceiling,
/// including the degenerate ceiling of one row.
#[tokio::test]
async fn test_completeness_across_page_ceilings() {
	let density = BTreeMap::from([
		(0u64, 3usize),
		(5, 1),
		(13, 10),
		(14, 10),
		(50, 25),
		(199, 2),
	]);

	for page_ceiling in [1usize, 7, 100] {
		let provider = Arc::new(SyntheticProvider::new(density.clone()));
		let harvester = harvester(
			provider.clone(),
			HarvestConfig {
				max_concurrency: 4,
				page_ceiling,
				failure_mode: FailureMode::Strict,
			},
		);

		let report = harvester
			.harvest(
				HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 200),
			)
			.await
			.unwrap();

		assert_eq!(
			report.records,
			provider.expected_records(0, 200),
			"ceiling {} must not change the result",
			page_ceiling
		);
	}
}

#[tokio::test]
async fn test_two_harvests_return_equal_results() {
	let density = BTreeMap::from([(10u64, 12usize), (11, 4), (90, 7)]);
	let provider = Arc::new(SyntheticProvider::new(density));
	let harvester = harvester(
		provider,
		HarvestConfig {
			max_concurrency: 3,
			page_ceiling: 5,
			failure_mode: FailureMode::Strict,
		},
	);

	let request = HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 100);
	let first = harvester.harvest(request.clone()).await.unwrap();
	let second = harvester.harvest(request).await.unwrap();

	assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn test_no_sub_range_is_fetched_twice() {
	let mut density = BTreeMap::new();
	for block in 0..64u64 {
		density.insert(block, 5usize);
	}
	let provider = Arc::new(SyntheticProvider::new(density));

	let harvester = harvester(
		provider.clone(),
		HarvestConfig {
			max_concurrency: 4,
			page_ceiling: 5,
			failure_mode: FailureMode::Strict,
		},
	);

	harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 63))
		.await
		.unwrap();

	let requests = provider.requests();
	let unique: HashSet<_> = requests.iter().copied().collect();
	assert_eq!(
		unique.len(),
		requests.len(),
		"the same (range, page) must never be requested twice"
	);
}

#[tokio::test]
async fn test_in_flight_requests_never_exceed_the_bound() {
	let mut density = BTreeMap::new();
	for block in 0..32u64 {
		density.insert(block, 5usize);
	}
	let provider =
		Arc::new(SyntheticProvider::new(density).with_delay(Duration::from_millis(10)));

	let harvester = harvester(
		provider.clone(),
		HarvestConfig {
			max_concurrency: 4,
			page_ceiling: 5,
			failure_mode: FailureMode::Strict,
		},
	);

	harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 31))
		.await
		.unwrap();

	assert!(
		provider.max_in_flight() <= 4,
		"observed {} concurrent requests",
		provider.max_in_flight()
	);
	assert!(
		provider.max_in_flight() >= 2,
		"workers should actually overlap"
	);
}

#[tokio::test]
async fn test_strict_mode_aborts_with_partial_harvest() {
	let mut density = BTreeMap::new();
	for block in 10..20u64 {
		density.insert(block, 5usize);
	}
	density.insert(70, 3);
	// The right half [50, 99] fails permanently; the root range succeeds
	let provider = Arc::new(
		SyntheticProvider::new(density)
			.failing_when(|start, end| start <= 70 && 70 <= end && end - start < 99),
	);

	let harvester = harvester(
		provider,
		HarvestConfig {
			max_concurrency: 2,
			page_ceiling: 10,
			failure_mode: FailureMode::Strict,
		},
	);

	let err = harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 99))
		.await
		.unwrap_err();

	match err {
		AggregatorError::PartialHarvest { failed, .. } => {
			assert_eq!(failed, FetchRange::new(50, 99));
		}
		other => panic!("expected PartialHarvest, got: {}", other),
	}
}

#[tokio::test]
async fn test_lenient_mode_reports_failures_and_continues() {
	let mut density = BTreeMap::new();
	for block in 10..20u64 {
		density.insert(block, 5usize);
	}
	density.insert(70, 3);
	let provider = Arc::new(
		SyntheticProvider::new(density)
			.failing_when(|start, end| start <= 70 && 70 <= end && end - start < 99),
	);

	let harvester = harvester(
		provider.clone(),
		HarvestConfig {
			max_concurrency: 2,
			page_ceiling: 10,
			failure_mode: FailureMode::Lenient,
		},
	);

	let report = harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(0, 99))
		.await
		.unwrap();

	assert_eq!(report.failures.len(), 1);
	assert_eq!(report.failures[0].range, FetchRange::new(50, 99));
	// Everything outside the failed half is still collected
	assert_eq!(report.records, provider.expected_records(0, 49));
	assert!(!report.canceled);
}

#[tokio::test]
async fn test_cancellation_is_prompt_and_flagged() {
	let mut density = BTreeMap::new();
	for block in 0..128u64 {
		density.insert(block, 10usize);
	}
	let provider =
		Arc::new(SyntheticProvider::new(density).with_delay(Duration::from_millis(25)));

	let harvester = harvester(
		provider.clone(),
		HarvestConfig {
			max_concurrency: 2,
			page_ceiling: 10,
			failure_mode: FailureMode::Strict,
		},
	);

	let (tx, rx) = watch::channel(false);
	let request = HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS)
		.blocks(0, 127)
		.shutdown(rx);

	let handle = tokio::spawn(async move { harvester.harvest(request).await });
	tokio::time::sleep(Duration::from_millis(60)).await;
	tx.send(true).unwrap();

	let report = handle.await.unwrap().unwrap();
	assert!(report.canceled, "a cut-short harvest must say so");

	// No new requests may start after cancellation
	let at_cancel = provider.requests().len();
	tokio::time::sleep(Duration::from_millis(100)).await;
	assert_eq!(provider.requests().len(), at_cancel);
}

#[tokio::test]
async fn test_open_ended_harvest_resolves_the_chain_tip() {
	let density = BTreeMap::from([(100u64, 1usize), (500, 2)]);
	let provider = Arc::new(SyntheticProvider::new(density));

	let harvester = harvester(provider.clone(), HarvestConfig::default());

	// No end block: the harvester snapshots the tip (block 500) up front
	let report = harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS))
		.await
		.unwrap();

	assert_eq!(report.records, provider.expected_records(0, 500));
}

#[tokio::test]
async fn test_non_range_method_is_rejected() {
	let provider = Arc::new(SyntheticProvider::new(BTreeMap::new()));
	let harvester = harvester(provider, HarvestConfig::default());

	let err = harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountBalance, ADDRESS).blocks(0, 10))
		.await
		.unwrap_err();

	assert!(matches!(err, AggregatorError::UnsupportedMethod(_)));
}

#[tokio::test]
async fn test_inverted_interval_is_rejected() {
	let provider = Arc::new(SyntheticProvider::new(BTreeMap::new()));
	let harvester = harvester(provider, HarvestConfig::default());

	let err = harvester
		.harvest(HarvestRequest::new(LogicalMethod::AccountTransactions, ADDRESS).blocks(10, 5))
		.await
		.unwrap_err();

	assert!(matches!(err, AggregatorError::InvalidRange(_)));
}
