//! Error types for the HTTP transport port.
//!
//! Transport errors cover connection-level failures (DNS, TCP, TLS, I/O) and
//! server failures that exhausted the retry policy. They are deliberately
//! distinct from HTTP error *statuses*, which the transport surfaces as data
//! so the scanner layer can interpret them per provider.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
	/// Connection-level failure after retries (DNS, TCP, TLS, I/O, timeout)
	#[error("Network error: {0}")]
	Network(ErrorContext),

	/// Server failure (HTTP 5xx) that survived the retry policy
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: u16,
		url: String,
		body: String,
		context: ErrorContext,
	},

	/// The request URL could not be parsed
	#[error("Invalid URL: {0}")]
	InvalidUrl(ErrorContext),
}

impl TransportError {
	pub fn network(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn http(status_code: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
		let url = url.into();
		let body = body.into();
		let msg = format!("HTTP error: status {} for URL {}", status_code, url);

		Self::Http {
			status_code,
			url,
			body,
			context: ErrorContext::new_with_log(msg, None, None),
		}
	}

	pub fn invalid_url(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
	) -> Self {
		Self::InvalidUrl(ErrorContext::new_with_log(msg, source, None))
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		match self {
			Self::Network(ctx) => ctx.trace_id.clone(),
			Self::Http { context, .. } => context.trace_id.clone(),
			Self::InvalidUrl(ctx) => ctx.trace_id.clone(),
		}
	}
}
