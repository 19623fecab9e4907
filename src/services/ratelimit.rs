//! Outbound request rate limiting.
//!
//! Explorer APIs enforce per-key request budgets (typically 5 requests per
//! second on free tiers). Every outbound call acquires from a [`RateLimiter`]
//! first; the limiter may be shared across clients to enforce a global budget.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Port gating outbound requests.
///
/// `acquire` suspends until the caller may proceed. Implementations must be
/// safe for concurrent use.
#[async_trait]
pub trait RateLimiter: Send + Sync {
	/// Waits until a request slot is available
	async fn acquire(&self);
}

/// Token bucket state under the limiter's mutex
struct BucketState {
	tokens: f64,
	last_refill: Instant,
}

/// Token-bucket limiter with a sustained rate and a burst capacity.
///
/// Tokens refill continuously at `rate` per second up to `burst`. A caller
/// that finds the bucket empty sleeps until the next token matures, so
/// waiters drain in arrival order under contention.
pub struct TokenBucketRateLimiter {
	rate: f64,
	burst: f64,
	state: Mutex<BucketState>,
}

impl TokenBucketRateLimiter {
	/// Creates a limiter allowing `rate` sustained requests per second with
	/// bursts up to `burst`. Rates are clamped to a sane minimum so a zero
	/// rate cannot stall the pipeline forever.
	pub fn new(rate: f64, burst: u32) -> Self {
		let rate = rate.max(0.01);
		let burst = f64::from(burst.max(1));
		Self {
			rate,
			burst,
			state: Mutex::new(BucketState {
				tokens: burst,
				last_refill: Instant::now(),
			}),
		}
	}

	/// Default budget matching common explorer free tiers
	pub fn default_per_key() -> Self {
		Self::new(5.0, 5)
	}
}

#[async_trait]
impl RateLimiter for TokenBucketRateLimiter {
	async fn acquire(&self) {
		loop {
			let wait = {
				let mut state = self.state.lock().await;
				let now = Instant::now();
				let elapsed = now.duration_since(state.last_refill).as_secs_f64();
				state.tokens = (state.tokens + elapsed * self.rate).min(self.burst);
				state.last_refill = now;

				if state.tokens >= 1.0 {
					state.tokens -= 1.0;
					return;
				}
				Duration::from_secs_f64((1.0 - state.tokens) / self.rate)
			};
			tokio::time::sleep(wait).await;
		}
	}
}

/// A limiter that never blocks. Used in tests and for providers without a
/// request budget.
pub struct UnlimitedRateLimiter;

#[async_trait]
impl RateLimiter for UnlimitedRateLimiter {
	async fn acquire(&self) {}
}
