//! Provider adapters (scanners).
//!
//! A [`Scanner`] binds the logical method catalogue to one provider on one
//! chain: it owns the provider's endpoint table, the resolved base URL, the
//! authentication mode and the per-call chain selection parameters. Scanners
//! build requests and parse responses; they never touch the network, which is
//! what keeps them independently testable.

mod endpoint;
mod error;
mod parsers;
pub mod providers;

pub use endpoint::{EndpointSpec, HttpVerb, ParamCodec, PreparedRequest};
pub use error::ScannerError;
pub use parsers::ResponseParser;

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::models::{CallParams, ChainInfo, LogicalMethod, ProviderFamily, SecretString};

/// How a provider expects its credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
	/// Credential travels as a query parameter with the given key
	Query(&'static str),
	/// Credential travels as an HTTP header with the given name
	Header(&'static str),
	/// No credential is sent
	None,
}

/// A provider adapter bound to one chain and credential.
///
/// Instantiated per `(provider, chain, api key)` triple by the factories in
/// [`providers`]; chain support is validated at construction, method support
/// at dispatch.
#[derive(Debug, Clone)]
pub struct Scanner {
	name: &'static str,
	version: &'static str,
	family: ProviderFamily,
	auth: AuthMode,
	api_key: Option<SecretString>,
	chain: ChainInfo,
	base_url: String,
	chain_query: Vec<(String, String)>,
	specs: HashMap<LogicalMethod, EndpointSpec>,
}

impl Scanner {
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn new(
		name: &'static str,
		version: &'static str,
		family: ProviderFamily,
		auth: AuthMode,
		api_key: Option<SecretString>,
		chain: ChainInfo,
		base_url: String,
		chain_query: Vec<(String, String)>,
		specs: HashMap<LogicalMethod, EndpointSpec>,
	) -> Self {
		Self {
			name,
			version,
			family,
			auth,
			api_key,
			chain,
			base_url,
			chain_query,
			specs,
		}
	}

	/// Provider name (e.g. `etherscan`)
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Provider version (e.g. `v2`)
	pub fn version(&self) -> &'static str {
		self.version
	}

	/// The provider family this scanner belongs to
	pub fn family(&self) -> ProviderFamily {
		self.family
	}

	/// The chain this scanner was constructed for
	pub fn chain(&self) -> &ChainInfo {
		&self.chain
	}

	/// The base URL requests are issued against
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Redirects the scanner at a different base URL.
	///
	/// Used by tests and by deployments that front the provider with a proxy;
	/// the endpoint table is unchanged.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Whether the provider implements the given logical method
	pub fn supports(&self, method: LogicalMethod) -> bool {
		self.specs.contains_key(&method)
	}

	/// The set of logical methods this provider implements
	pub fn supported_methods(&self) -> BTreeSet<LogicalMethod> {
		self.specs.keys().copied().collect()
	}

	/// The endpoint specification for a method, or `MethodNotSupported`
	pub fn spec(&self, method: LogicalMethod) -> Result<&EndpointSpec, ScannerError> {
		self.specs.get(&method).ok_or_else(|| {
			let available: Vec<String> = self
				.supported_methods()
				.iter()
				.map(|m| m.to_string())
				.collect();
			ScannerError::method_not_supported(
				format!(
					"method '{}' is not supported by {} {} on {}, available: {}",
					method,
					self.name,
					self.version,
					self.chain.display_name,
					available.join(", ")
				),
				None,
			)
		})
	}

	/// Builds the wire request for a logical call: interprets the endpoint
	/// spec, then injects chain selection and authentication.
	pub fn prepare(
		&self,
		method: LogicalMethod,
		params: &CallParams,
	) -> Result<PreparedRequest, ScannerError> {
		let spec = self.spec(method)?;
		let mut request = spec.build(&self.base_url, params)?;

		for (key, value) in &self.chain_query {
			request.query.push((key.clone(), value.clone()));
		}

		request
			.headers
			.push(("Accept".to_string(), "application/json".to_string()));

		match &self.auth {
			AuthMode::Query(field) => {
				if let Some(key) = &self.api_key {
					request
						.query
						.push((field.to_string(), key.as_str().to_string()));
				}
			}
			AuthMode::Header(field) => {
				if let Some(key) = &self.api_key {
					request
						.headers
						.push((field.to_string(), key.as_str().to_string()));
				}
			}
			AuthMode::None => {}
		}

		Ok(request)
	}

	/// Applies the method's parser to a decoded payload
	pub fn parse(&self, method: LogicalMethod, payload: Value) -> Result<Value, ScannerError> {
		self.spec(method)?.response_parser().parse(payload)
	}
}
