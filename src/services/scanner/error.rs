//! Scanner error types and handling.
//!
//! Covers everything between "the caller asked for a logical method" and "the
//! provider's payload became a logical result": unsupported chains and
//! methods, argument validation, authentication, provider-signaled failures
//! and malformed payloads.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// Represents possible errors raised while dispatching or parsing a scanner call
#[derive(Debug, Error)]
pub enum ScannerError {
	/// The resolved chain lacks the mapping hint this provider needs
	#[error("Chain not supported: {0}")]
	ChainNotSupported(ErrorContext),

	/// The provider has no endpoint for the requested logical method
	#[error("Method not supported: {0}")]
	MethodNotSupported(ErrorContext),

	/// Missing required parameter, unfilled path placeholder or malformed value
	#[error("Invalid argument: {0}")]
	InvalidArgument(ErrorContext),

	/// The provider demands an API key and none was supplied
	#[error("Authentication required: {0}")]
	AuthRequired(ErrorContext),

	/// The provider signaled quota exhaustion after the retry policy gave up
	#[error("Rate limited: {0}")]
	RateLimited(ErrorContext),

	/// The provider returned a structured error; its message is preserved verbatim
	#[error("Provider error: {0}")]
	Provider(ErrorContext),

	/// The response payload did not match the parser's expectation
	#[error("Parse error: {0}")]
	Parse(ErrorContext),
}

impl ScannerError {
	pub fn chain_not_supported(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ChainNotSupported(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn method_not_supported(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::MethodNotSupported(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn invalid_argument(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidArgument(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn auth_required(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::AuthRequired(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn rate_limited(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RateLimited(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn provider(msg: impl Into<String>, metadata: Option<HashMap<String, String>>) -> Self {
		Self::Provider(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn parse(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Parse(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Stable machine-readable kind, used by telemetry
	pub fn kind(&self) -> &'static str {
		match self {
			Self::ChainNotSupported(_) => "chain_not_supported",
			Self::MethodNotSupported(_) => "method_not_supported",
			Self::InvalidArgument(_) => "invalid_argument",
			Self::AuthRequired(_) => "auth_required",
			Self::RateLimited(_) => "rate_limited",
			Self::Provider(_) => "provider_error",
			Self::Parse(_) => "parse_error",
		}
	}
}

impl TraceableError for ScannerError {
	fn trace_id(&self) -> String {
		match self {
			Self::ChainNotSupported(ctx) => ctx.trace_id.clone(),
			Self::MethodNotSupported(ctx) => ctx.trace_id.clone(),
			Self::InvalidArgument(ctx) => ctx.trace_id.clone(),
			Self::AuthRequired(ctx) => ctx.trace_id.clone(),
			Self::RateLimited(ctx) => ctx.trace_id.clone(),
			Self::Provider(ctx) => ctx.trace_id.clone(),
			Self::Parse(ctx) => ctx.trace_id.clone(),
		}
	}
}
