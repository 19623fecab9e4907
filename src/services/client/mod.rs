//! Unified client implementation.
//!
//! The client is a thin composition: one scanner plus the shared
//! infrastructure ports (HTTP, rate limiter, cache, telemetry). A call runs
//! telemetry span -> rate-limit acquire -> cache lookup -> dispatch ->
//! cache store -> telemetry record, and nothing else; retries live inside
//! the HTTP port, domain semantics inside the scanner.

mod error;

pub use error::ClientError;

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

use crate::{
	models::{CallParams, ChainInfo, ChainRef, LogicalMethod, SecretString},
	repositories::{ChainRegistry, ProviderRegistry},
	services::{
		cache::Cache,
		ratelimit::{RateLimiter, TokenBucketRateLimiter},
		scanner::{HttpVerb, Scanner, ScannerError},
		telemetry::{CallEvent, CallOutcome, Telemetry, TracingTelemetry},
		transport::{HttpClient, HttpTransportClient, TransportError},
	},
	utils::http::HttpConfig,
};

/// How long cacheable results are retained by default
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// How much response body to quote in parse errors
const BODY_SNIPPET_LEN: usize = 200;

/// A unified client for one provider on one chain.
///
/// Owns no network resources directly: the HTTP port is shared and
/// reference-counted, so dropping the client releases its share. The client
/// is safe to use concurrently provided the injected ports are.
#[derive(Clone)]
pub struct ChainscanClient {
	scanner: Scanner,
	http: Arc<dyn HttpClient>,
	rate_limiter: Arc<dyn RateLimiter>,
	cache: Option<Arc<dyn Cache>>,
	cache_ttl: Duration,
	telemetry: Arc<dyn Telemetry>,
}

impl std::fmt::Debug for ChainscanClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChainscanClient")
			.field("scanner", &self.scanner)
			.field("cache_ttl", &self.cache_ttl)
			.finish_non_exhaustive()
	}
}

impl ChainscanClient {
	/// Starts building a client for the given provider and version
	pub fn builder(provider: impl Into<String>, version: impl Into<String>) -> ClientBuilder {
		ClientBuilder::new(provider, version)
	}

	/// The scanner this client dispatches through
	pub fn scanner(&self) -> &Scanner {
		&self.scanner
	}

	/// The chain this client targets
	pub fn chain(&self) -> &ChainInfo {
		self.scanner.chain()
	}

	/// Whether the provider implements the given logical method
	pub fn supports(&self, method: LogicalMethod) -> bool {
		self.scanner.supports(method)
	}

	/// Invokes a logical method with the given parameters.
	///
	/// Argument validation happens before any network activity; provider
	/// errors surface unchanged. Cacheable results are served from and stored
	/// into the cache when one is configured.
	#[instrument(
		skip(self, params),
		fields(
			provider = self.scanner.name(),
			chain_id = self.scanner.chain().chain_id,
			method = %method,
		)
	)]
	pub async fn call(
		&self,
		method: LogicalMethod,
		params: CallParams,
	) -> Result<Value, ClientError> {
		let started = Instant::now();
		let (result, status_code, cache_hit) = self.dispatch(method, &params).await;

		let outcome = match &result {
			Ok(_) if cache_hit => CallOutcome::CacheHit,
			Ok(_) => CallOutcome::Success,
			Err(err) => CallOutcome::Error(err.kind()),
		};
		self.telemetry.record_call(&CallEvent {
			provider: self.scanner.name().to_string(),
			version: self.scanner.version().to_string(),
			chain_id: self.scanner.chain().chain_id,
			method,
			outcome,
			duration: started.elapsed(),
			status_code,
		});

		result
	}

	async fn dispatch(
		&self,
		method: LogicalMethod,
		params: &CallParams,
	) -> (Result<Value, ClientError>, Option<u16>, bool) {
		// Build the request up front so invalid arguments and unsupported
		// methods fail before any network or cache activity.
		let prepared = match self.scanner.prepare(method, params) {
			Ok(prepared) => prepared,
			Err(err) => return (Err(err.into()), None, false),
		};

		let cacheable = self
			.scanner
			.spec(method)
			.map(|spec| spec.is_cacheable())
			.unwrap_or(false);
		let cache_key = self.cache_key(method, params);

		if cacheable {
			if let Some(cache) = &self.cache {
				if let Some(value) = cache.get(&cache_key).await {
					return (Ok(value), None, true);
				}
			}
		}

		self.rate_limiter.acquire().await;

		let response = match prepared.verb {
			HttpVerb::Get => {
				self.http
					.get(&prepared.url, &prepared.query, &prepared.headers)
					.await
			}
			HttpVerb::Post => {
				self.http
					.post(
						&prepared.url,
						&prepared.query,
						&prepared.headers,
						prepared.body.as_ref(),
					)
					.await
			}
		};

		let response = match response {
			Ok(response) => response,
			Err(err) => return (Err(err.into()), None, false),
		};
		let status = response.status;

		if !response.is_success() {
			return (
				Err(self.status_error(method, status, &prepared.url, response.body)),
				Some(status),
				false,
			);
		}

		let payload: Value = match serde_json::from_str(&response.body) {
			Ok(payload) => payload,
			Err(err) => {
				let snippet = snippet(&response.body);
				return (
					Err(ScannerError::parse(
						format!("response body is not valid JSON: {}", snippet),
						Some(Box::new(err)),
						Some(self.error_metadata(method)),
					)
					.into()),
					Some(status),
					false,
				);
			}
		};

		let value = match self.scanner.parse(method, payload) {
			Ok(value) => value,
			Err(err) => return (Err(err.into()), Some(status), false),
		};

		if cacheable {
			if let Some(cache) = &self.cache {
				cache.set(&cache_key, value.clone(), self.cache_ttl).await;
			}
		}

		(Ok(value), Some(status), false)
	}

	/// Maps non-2xx statuses that survived the retry policy.
	///
	/// 429 means the provider's quota is exhausted; other 4xx are structured
	/// provider rejections; 5xx is a transport-level failure.
	fn status_error(
		&self,
		method: LogicalMethod,
		status: u16,
		url: &str,
		body: String,
	) -> ClientError {
		if status == 429 {
			return ScannerError::rate_limited(
				format!(
					"{} {} rate limited {} on {} after retries",
					self.scanner.name(),
					self.scanner.version(),
					method,
					self.scanner.chain().display_name,
				),
				Some(self.error_metadata(method)),
			)
			.into();
		}
		if (500..600).contains(&status) {
			return TransportError::http(status, url, body).into();
		}
		ScannerError::provider(
			format!("HTTP {}: {}", status, snippet(&body)),
			Some(self.error_metadata(method)),
		)
		.into()
	}

	fn cache_key(&self, method: LogicalMethod, params: &CallParams) -> String {
		format!(
			"{}:{}:{}:{}:{}",
			self.scanner.name(),
			self.scanner.version(),
			self.scanner.chain().chain_id,
			method,
			params.fingerprint(),
		)
	}

	fn error_metadata(&self, method: LogicalMethod) -> HashMap<String, String> {
		HashMap::from([
			("provider".to_string(), self.scanner.name().to_string()),
			(
				"chain".to_string(),
				self.scanner.chain().display_name.clone(),
			),
			("method".to_string(), method.to_string()),
		])
	}
}

fn snippet(body: &str) -> String {
	let trimmed = body.trim();
	if trimmed.len() <= BODY_SNIPPET_LEN {
		trimmed.to_string()
	} else {
		let cut = trimmed
			.char_indices()
			.take_while(|(i, _)| *i < BODY_SNIPPET_LEN)
			.last()
			.map(|(i, c)| i + c.len_utf8())
			.unwrap_or(BODY_SNIPPET_LEN);
		format!("{}...", &trimmed[..cut])
	}
}

/// Builder assembling a [`ChainscanClient`] from a provider, a chain
/// reference and optional port overrides.
///
/// Registries default to the bundled ones; tests inject their own at this
/// boundary instead of mutating global state.
pub struct ClientBuilder {
	provider: String,
	version: String,
	chain: Option<ChainRef>,
	api_key: Option<SecretString>,
	base_url: Option<String>,
	http: Option<Arc<dyn HttpClient>>,
	rate_limiter: Option<Arc<dyn RateLimiter>>,
	cache: Option<Arc<dyn Cache>>,
	cache_ttl: Duration,
	telemetry: Option<Arc<dyn Telemetry>>,
	chain_registry: Option<ChainRegistry>,
	provider_registry: Option<ProviderRegistry>,
}

impl ClientBuilder {
	fn new(provider: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			provider: provider.into(),
			version: version.into(),
			chain: None,
			api_key: None,
			base_url: None,
			http: None,
			rate_limiter: None,
			cache: None,
			cache_ttl: DEFAULT_CACHE_TTL,
			telemetry: None,
			chain_registry: None,
			provider_registry: None,
		}
	}

	/// Targets a chain by id, name or alias
	pub fn chain(mut self, chain: impl Into<ChainRef>) -> Self {
		self.chain = Some(chain.into());
		self
	}

	/// Supplies the provider credential
	pub fn api_key(mut self, api_key: impl Into<SecretString>) -> Self {
		self.api_key = Some(api_key.into());
		self
	}

	/// Overrides the provider's base URL (proxies, test servers)
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	/// Injects a shared HTTP port
	pub fn http(mut self, http: Arc<dyn HttpClient>) -> Self {
		self.http = Some(http);
		self
	}

	/// Injects a shared rate limiter
	pub fn rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
		self.rate_limiter = Some(rate_limiter);
		self
	}

	/// Enables response caching for finality-safe methods
	pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
		self.cache = Some(cache);
		self
	}

	/// Adjusts how long cached results are retained
	pub fn cache_ttl(mut self, ttl: Duration) -> Self {
		self.cache_ttl = ttl;
		self
	}

	/// Injects a telemetry sink
	pub fn telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
		self.telemetry = Some(telemetry);
		self
	}

	/// Substitutes the chain registry (tests)
	pub fn chain_registry(mut self, registry: ChainRegistry) -> Self {
		self.chain_registry = Some(registry);
		self
	}

	/// Substitutes the provider registry (tests)
	pub fn provider_registry(mut self, registry: ProviderRegistry) -> Self {
		self.provider_registry = Some(registry);
		self
	}

	/// Resolves the chain, instantiates the scanner and assembles the client
	pub fn build(self) -> Result<ChainscanClient, ClientError> {
		let chain_ref = self.chain.ok_or_else(|| {
			ScannerError::invalid_argument("a chain reference is required", None)
		})?;

		let chain = match &self.chain_registry {
			Some(registry) => registry.resolve(&chain_ref)?.clone(),
			None => ChainRegistry::bundled().resolve(&chain_ref)?.clone(),
		};

		let factory = match &self.provider_registry {
			Some(registry) => registry.get(&self.provider, &self.version)?,
			None => ProviderRegistry::bundled().get(&self.provider, &self.version)?,
		};

		let mut scanner = factory(&chain, self.api_key)?;
		if let Some(base_url) = self.base_url {
			scanner = scanner.with_base_url(base_url);
		}

		let http = match self.http {
			Some(http) => http,
			None => Arc::new(HttpTransportClient::new(&HttpConfig::default())?),
		};

		Ok(ChainscanClient {
			scanner,
			http,
			rate_limiter: self
				.rate_limiter
				.unwrap_or_else(|| Arc::new(TokenBucketRateLimiter::default_per_key())),
			cache: self.cache,
			cache_ttl: self.cache_ttl,
			telemetry: self
				.telemetry
				.unwrap_or_else(|| Arc::new(TracingTelemetry)),
		})
	}
}
