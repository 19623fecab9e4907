//! Registry error types and handling.
//!
//! Covers chain resolution failures, unknown provider lookups and invalid
//! catalogue construction.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// Represents errors raised by the chain and provider registries
#[derive(Debug, Error)]
pub enum RegistryError {
	/// The chain reference did not resolve to any catalogued chain
	#[error("Unknown chain: {0}")]
	UnknownChain(ErrorContext),

	/// The (provider, version) pair is not registered
	#[error("Unknown provider: {0}")]
	UnknownProvider(ErrorContext),

	/// The catalogue itself is inconsistent (duplicate ids or aliases)
	#[error("Invalid chain catalogue: {0}")]
	InvalidCatalogue(ErrorContext),
}

impl RegistryError {
	/// Unknown chain, carrying the caller's input verbatim plus the closest
	/// catalogued names
	pub fn unknown_chain(input: impl Into<String>, suggestions: &[String]) -> Self {
		let input = input.into();
		let msg = if suggestions.is_empty() {
			format!("chain reference '{}' does not resolve", input)
		} else {
			format!(
				"chain reference '{}' does not resolve, did you mean: {}",
				input,
				suggestions.join(", ")
			)
		};
		Self::UnknownChain(ErrorContext::new_with_log(
			msg,
			None,
			Some(HashMap::from([("input".to_string(), input)])),
		))
	}

	/// Unknown (provider, version) pair, listing what is registered
	pub fn unknown_provider(
		name: impl Into<String>,
		version: impl Into<String>,
		registered: &[String],
	) -> Self {
		let name = name.into();
		let version = version.into();
		let msg = format!(
			"provider '{} {}' is not registered, available: {}",
			name,
			version,
			registered.join(", ")
		);
		Self::UnknownProvider(ErrorContext::new_with_log(
			msg,
			None,
			Some(HashMap::from([
				("provider".to_string(), name),
				("version".to_string(), version),
			])),
		))
	}

	/// Invalid catalogue detected at construction
	pub fn invalid_catalogue(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidCatalogue(ErrorContext::new_with_log(msg, None, metadata))
	}
}

impl TraceableError for RegistryError {
	fn trace_id(&self) -> String {
		match self {
			Self::UnknownChain(ctx) => ctx.trace_id.clone(),
			Self::UnknownProvider(ctx) => ctx.trace_id.clone(),
			Self::InvalidCatalogue(ctx) => ctx.trace_id.clone(),
		}
	}
}
