//! Aggregator error types and handling.

use crate::{
	services::aggregator::range::FetchRange,
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error;

/// Represents possible errors raised by the range-splitting harvester
#[derive(Debug, Error)]
pub enum AggregatorError {
	/// The logical method does not return block-range-scoped records
	#[error("Method not harvestable: {0}")]
	UnsupportedMethod(ErrorContext),

	/// The requested block interval is empty or inverted
	#[error("Invalid range: {0}")]
	InvalidRange(ErrorContext),

	/// A sub-range failed permanently in strict mode; the harvest was aborted
	#[error("Partial harvest: {context}")]
	PartialHarvest {
		/// Sub-ranges that completed before the abort
		completed: Vec<FetchRange>,
		/// The sub-range whose call failed
		failed: FetchRange,
		context: ErrorContext,
	},
}

impl AggregatorError {
	pub fn unsupported_method(msg: impl Into<String>) -> Self {
		Self::UnsupportedMethod(ErrorContext::new_with_log(msg, None, None))
	}

	pub fn invalid_range(msg: impl Into<String>) -> Self {
		Self::InvalidRange(ErrorContext::new_with_log(msg, None, None))
	}

	pub fn partial_harvest(
		completed: Vec<FetchRange>,
		failed: FetchRange,
		source: Box<dyn std::error::Error + Send + Sync + 'static>,
	) -> Self {
		let msg = format!(
			"sub-range {} failed after retries, {} sub-ranges completed before abort",
			failed,
			completed.len()
		);
		let context = ErrorContext::new_with_log(
			msg,
			Some(source),
			Some(HashMap::from([(
				"failed_range".to_string(),
				failed.to_string(),
			)])),
		);
		Self::PartialHarvest {
			completed,
			failed,
			context,
		}
	}
}

impl TraceableError for AggregatorError {
	fn trace_id(&self) -> String {
		match self {
			Self::UnsupportedMethod(ctx) => ctx.trace_id.clone(),
			Self::InvalidRange(ctx) => ctx.trace_id.clone(),
			Self::PartialHarvest { context, .. } => context.trace_id.clone(),
		}
	}
}
