//! Logical call parameters.

use serde_json::Value;
use std::collections::{btree_map, BTreeMap};

/// An ordered bag of logical parameters for a single call.
///
/// Keys are logical names (`address`, `start_block`, ...); the scanner's
/// endpoint specification renames them to wire names at dispatch time. Keys
/// not known to the endpoint are forwarded under their original names, which
/// is how provider-specific extensions (e.g. `topic0` filters) pass through.
///
/// The backing map is a `BTreeMap`, so iteration order is deterministic and
/// the cache fingerprint is canonical without extra sorting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallParams(BTreeMap<String, Value>);

impl CallParams {
	/// Creates an empty parameter bag
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a parameter, consuming and returning the bag for chaining
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	/// Inserts a parameter in place
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(key.into(), value.into());
	}

	/// Returns the value of a parameter, if present
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Removes a parameter and returns its value
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.0.remove(key)
	}

	/// True when no parameters are set
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates parameters in key order
	pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
		self.0.iter()
	}

	/// Canonical `key=value` fingerprint of the parameters, used as the
	/// variable part of cache keys. Null-valued parameters are excluded, the
	/// same way they are excluded from the wire request.
	pub fn fingerprint(&self) -> String {
		let mut parts = Vec::with_capacity(self.0.len());
		for (key, value) in &self.0 {
			if value.is_null() {
				continue;
			}
			match value.as_str() {
				Some(s) => parts.push(format!("{}={}", key, s)),
				None => parts.push(format!("{}={}", key, value)),
			}
		}
		parts.join("&")
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CallParams {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}
