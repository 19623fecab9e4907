//! Record identity and ordering.
//!
//! The aggregator treats provider records opaquely except for two derived
//! keys: a deduplication key and a sort key. Field names vary between
//! Etherscan-style camelCase and Blockscout-style snake_case; both are
//! accepted, and numeric fields may arrive hex- or decimal-encoded.

use serde_json::Value;
use std::collections::HashSet;

use crate::{models::LogicalMethod, utils::parse_quantity};

fn field<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
	names.iter().find_map(|name| record.get(*name))
}

fn tx_hash(record: &Value) -> Option<&str> {
	field(record, &["transactionHash", "transaction_hash", "hash"])?.as_str()
}

fn log_index(record: &Value) -> Option<u64> {
	field(record, &["logIndex", "log_index"]).and_then(parse_quantity)
}

fn trace_id(record: &Value) -> Option<String> {
	let value = field(record, &["traceId", "trace_id", "traceAddress", "trace_address"])?;
	match value {
		Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

/// Derives the deduplication key for a record.
///
/// Transactions and token transfers key on the transaction hash, logs on
/// (hash, log index), internal transactions on (hash, trace id). When the
/// provider omits the identifying fields the key degrades to the exact JSON
/// encoding of the record, a best-effort match.
pub(crate) fn dedup_key(method: LogicalMethod, record: &Value) -> String {
	match method {
		LogicalMethod::EventLogs => match (tx_hash(record), log_index(record)) {
			(Some(hash), Some(index)) => format!("{}:{}", hash, index),
			_ => record.to_string(),
		},
		LogicalMethod::AccountInternalTransactions => {
			match (tx_hash(record), trace_id(record)) {
				(Some(hash), Some(trace)) => format!("{}:{}", hash, trace),
				_ => record.to_string(),
			}
		}
		_ => tx_hash(record)
			.map(str::to_string)
			.unwrap_or_else(|| record.to_string()),
	}
}

/// Derives the sort key `(block, tx index, log index)` for a record.
///
/// Returns None when the block number is missing or non-numeric; such records
/// sort after all keyed records in insertion order.
pub(crate) fn sort_key(record: &Value) -> Option<(u64, u64, u64)> {
	let block = field(record, &["blockNumber", "block_number"]).and_then(parse_quantity)?;
	let tx_index = field(record, &["transactionIndex", "transaction_index"])
		.and_then(parse_quantity)
		.unwrap_or(0);
	let log = log_index(record).unwrap_or(0);
	Some((block, tx_index, log))
}

/// Deduplicates and orders harvested records.
///
/// Keeps the first occurrence per deduplication key, sorts keyed records by
/// (block, tx index, log index) ascending, and appends unkeyed records in
/// insertion order.
pub(crate) fn dedup_and_sort(method: LogicalMethod, records: Vec<Value>) -> Vec<Value> {
	let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
	let mut keyed: Vec<((u64, u64, u64), usize, Value)> = Vec::new();
	let mut unkeyed: Vec<Value> = Vec::new();

	for (index, record) in records.into_iter().enumerate() {
		if !seen.insert(dedup_key(method, &record)) {
			continue;
		}
		match sort_key(&record) {
			Some(key) => keyed.push((key, index, record)),
			None => unkeyed.push(record),
		}
	}

	keyed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

	let mut out: Vec<Value> = keyed.into_iter().map(|(_, _, record)| record).collect();
	out.extend(unkeyed);
	out
}
