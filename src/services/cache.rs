//! Response caching for finality-safe methods.
//!
//! Methods whose result is a function of final blocks (contract ABI, mined
//! transactions, old blocks) can be cached; live state never is. Cacheability
//! is declared per endpoint specification, the cache itself only stores and
//! expires entries.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Port for an optional response cache.
///
/// Lookup failures and storage errors are treated as misses by the caller, so
/// implementations are free to drop entries at any time. Writers must be
/// serialized per key; readers may proceed concurrently.
#[async_trait]
pub trait Cache: Send + Sync {
	/// Returns the cached value for the key, or None on miss/expiry
	async fn get(&self, key: &str) -> Option<Value>;

	/// Stores a value under the key for at most `ttl`
	async fn set(&self, key: &str, value: Value, ttl: Duration);
}

/// In-memory TTL cache.
///
/// Entries expire lazily on read; a write sweeps expired entries when the map
/// has grown past a threshold to bound memory.
pub struct InMemoryCache {
	entries: RwLock<HashMap<String, (Value, Instant)>>,
	sweep_threshold: usize,
}

impl InMemoryCache {
	pub fn new() -> Self {
		Self {
			entries: RwLock::new(HashMap::new()),
			sweep_threshold: 4096,
		}
	}
}

impl Default for InMemoryCache {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Cache for InMemoryCache {
	async fn get(&self, key: &str) -> Option<Value> {
		let now = Instant::now();
		{
			let entries = self.entries.read().await;
			match entries.get(key) {
				Some((value, deadline)) if *deadline > now => return Some(value.clone()),
				Some(_) => {}
				None => return None,
			}
		}

		// Expired: drop the entry under the write lock
		let mut entries = self.entries.write().await;
		if let Some((_, deadline)) = entries.get(key) {
			if *deadline <= now {
				entries.remove(key);
			}
		}
		None
	}

	async fn set(&self, key: &str, value: Value, ttl: Duration) {
		let now = Instant::now();
		let mut entries = self.entries.write().await;
		if entries.len() >= self.sweep_threshold {
			entries.retain(|_, (_, deadline)| *deadline > now);
		}
		entries.insert(key.to_string(), (value, now + ttl));
	}
}
