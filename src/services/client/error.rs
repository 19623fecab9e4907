//! Unified client error type.
//!
//! A thin sum over the registry, scanner and transport errors a call can
//! surface. Domain errors pass through unchanged; the client never swallows
//! or reinterprets provider semantics.

use thiserror::Error;

use crate::{
	repositories::RegistryError,
	services::{scanner::ScannerError, transport::TransportError},
	utils::logging::error::TraceableError,
};

#[derive(Debug, Error)]
pub enum ClientError {
	/// Chain or provider resolution failed
	#[error(transparent)]
	Registry(#[from] RegistryError),

	/// Dispatch or response interpretation failed
	#[error(transparent)]
	Scanner(#[from] ScannerError),

	/// The HTTP port failed after retries
	#[error(transparent)]
	Transport(#[from] TransportError),
}

impl ClientError {
	/// Stable machine-readable kind, used by telemetry
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Registry(RegistryError::UnknownChain(_)) => "unknown_chain",
			Self::Registry(RegistryError::UnknownProvider(_)) => "unknown_provider",
			Self::Registry(RegistryError::InvalidCatalogue(_)) => "invalid_catalogue",
			Self::Scanner(err) => err.kind(),
			Self::Transport(_) => "transport_error",
		}
	}
}

impl TraceableError for ClientError {
	fn trace_id(&self) -> String {
		match self {
			Self::Registry(err) => err.trace_id(),
			Self::Scanner(err) => err.trace_id(),
			Self::Transport(err) => err.trace_id(),
		}
	}
}
