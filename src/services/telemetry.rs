//! Structured telemetry for outbound calls.
//!
//! Every client call emits one [`CallEvent`] with a stable field schema, so
//! operators can aggregate by provider, chain and method regardless of the
//! sink. The default sink forwards to `tracing`.

use std::time::Duration;

use crate::models::LogicalMethod;

/// How a call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
	/// The provider returned a usable result
	Success,
	/// The result was served from cache without a network call
	CacheHit,
	/// The call failed; the payload carries the stable error kind
	Error(&'static str),
}

impl CallOutcome {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::CacheHit => "cache_hit",
			Self::Error(kind) => kind,
		}
	}
}

/// One telemetry record describing a finished call
#[derive(Debug, Clone)]
pub struct CallEvent {
	/// Provider name (e.g. `etherscan`)
	pub provider: String,
	/// Provider version (e.g. `v2`)
	pub version: String,
	/// EIP-155 chain id the call targeted
	pub chain_id: u64,
	/// Logical method invoked
	pub method: LogicalMethod,
	/// Outcome classification
	pub outcome: CallOutcome,
	/// Wall-clock duration of the call
	pub duration: Duration,
	/// HTTP status code, when a response was received
	pub status_code: Option<u16>,
}

/// Port receiving call events.
pub trait Telemetry: Send + Sync {
	/// Records a finished call
	fn record_call(&self, event: &CallEvent);
}

/// Telemetry sink emitting `tracing` events with stable field names.
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
	fn record_call(&self, event: &CallEvent) {
		tracing::info!(
			provider = %event.provider,
			version = %event.version,
			chain_id = event.chain_id,
			method = %event.method,
			outcome = event.outcome.as_str(),
			duration_ms = event.duration.as_millis() as u64,
			status_code = event.status_code,
			"scanner.call"
		);
	}
}

/// Telemetry sink that discards all events.
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
	fn record_call(&self, _event: &CallEvent) {}
}
