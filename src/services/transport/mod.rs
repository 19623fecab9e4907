//! HTTP transport port and its production implementation.
//!
//! The scanner layer builds requests as data; this module moves them over the
//! wire. The [`HttpClient`] trait is the seam tests mock out. The production
//! [`HttpTransportClient`] wraps a pooled `reqwest` client behind retry
//! middleware: transient failures, HTTP 429 and 5xx are retried with
//! exponential backoff before anything surfaces to the caller.

mod error;

pub use error::TransportError;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde_json::Value;
use url::Url;

use crate::utils::http::{create_retryable_http_client, HttpConfig};

/// A fully received HTTP response.
///
/// Error statuses are data, not errors: the scanner layer decides what a 403
/// or 429 from a given provider means.
#[derive(Debug, Clone)]
pub struct HttpResponse {
	/// HTTP status code
	pub status: u16,
	/// Response body as text
	pub body: String,
}

impl HttpResponse {
	/// True for 2xx statuses
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Port for issuing HTTP requests to explorer APIs.
///
/// Implementations must be safe for concurrent use; a single instance is
/// shared by every client and every aggregator worker.
#[async_trait]
pub trait HttpClient: Send + Sync {
	/// Issues a GET request with the given query pairs and headers
	async fn get(
		&self,
		url: &str,
		query: &[(String, String)],
		headers: &[(String, String)],
	) -> Result<HttpResponse, TransportError>;

	/// Issues a POST request with the given query pairs, headers and optional
	/// JSON body
	async fn post<'a>(
		&self,
		url: &'a str,
		query: &'a [(String, String)],
		headers: &'a [(String, String)],
		body: Option<&'a Value>,
	) -> Result<HttpResponse, TransportError>;
}

/// A retry strategy that retries on transient failures based on the status code
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}

/// Production HTTP transport over a pooled, retry-capable `reqwest` client.
///
/// The client is cheap to clone and safe to share across tasks; all clones
/// reuse one connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	client: ClientWithMiddleware,
}

impl HttpTransportClient {
	/// Creates a transport from the given connection and retry settings
	pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(config.pool_idle_timeout)
			.timeout(config.request_timeout)
			.connect_timeout(config.connect_timeout)
			.build()
			.map_err(|e| {
				TransportError::network(
					"Failed to create base HTTP client",
					Some(Box::new(e)),
					None,
				)
			})?;

		let client = create_retryable_http_client(
			&config.retry,
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self { client })
	}

	fn parse_url(url: &str) -> Result<Url, TransportError> {
		Url::parse(url).map_err(|e| TransportError::invalid_url(url, Some(Box::new(e))))
	}

	async fn read_response(
		url: &str,
		response: reqwest::Response,
	) -> Result<HttpResponse, TransportError> {
		let status = response.status().as_u16();
		let body = response.text().await.map_err(|e| {
			TransportError::network(
				format!("Failed to read response body from {}", url),
				Some(Box::new(e)),
				None,
			)
		})?;
		Ok(HttpResponse { status, body })
	}
}

#[async_trait]
impl HttpClient for HttpTransportClient {
	async fn get(
		&self,
		url: &str,
		query: &[(String, String)],
		headers: &[(String, String)],
	) -> Result<HttpResponse, TransportError> {
		let parsed = Self::parse_url(url)?;

		let mut request = self.client.get(parsed).query(query);
		for (name, value) in headers {
			request = request.header(name, value);
		}

		let response = request.send().await.map_err(|e| {
			TransportError::network(
				format!("GET {} failed", url),
				Some(Box::new(e)),
				None,
			)
		})?;

		Self::read_response(url, response).await
	}

	async fn post<'a>(
		&self,
		url: &'a str,
		query: &'a [(String, String)],
		headers: &'a [(String, String)],
		body: Option<&'a Value>,
	) -> Result<HttpResponse, TransportError> {
		let parsed = Self::parse_url(url)?;

		let mut request = self.client.post(parsed).query(query);
		for (name, value) in headers {
			request = request.header(name, value);
		}
		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await.map_err(|e| {
			TransportError::network(
				format!("POST {} failed", url),
				Some(Box::new(e)),
				None,
			)
		})?;

		Self::read_response(url, response).await
	}
}
