//! Bulk collection over block ranges.
//!
//! Provider APIs cap how many rows a single call may return, so "give me
//! every transaction of this address over these ten million blocks" cannot be
//! one query. The harvester here adapts to the ceiling by recursively
//! bisecting block ranges until every sub-range provably fits in one page,
//! with a bounded worker pool and a rate-limit gate in front of the wire.

mod error;
mod range;
mod record;
mod service;

pub use error::AggregatorError;
pub use range::FetchRange;
pub use service::{
	FailureMode, HarvestConfig, HarvestReport, HarvestRequest, HarvestStats, RangeFailure,
	RangeHarvester,
};
