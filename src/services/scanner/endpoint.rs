//! Declarative endpoint specifications and the dispatch interpreter.
//!
//! An [`EndpointSpec`] is data, not code: it names the HTTP verb, the path
//! template, the static query skeleton, how logical parameter names map to
//! wire names, which parameters bind into the path, and which parser reads
//! the response. Adding a provider means writing a table of these, never
//! touching the interpreter.

use serde_json::Value;

use crate::{
	models::CallParams,
	services::scanner::{error::ScannerError, parsers::ResponseParser},
};

/// HTTP verb of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
	Get,
	Post,
}

/// Wire encodings a parameter value may be forced into.
///
/// The set is closed; providers that demand unusual encodings reference one of
/// these in their spec instead of special-casing the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCodec {
	/// Encode integers (and decimal strings) as 0x-prefixed hex. Non-numeric
	/// strings such as `latest` pass through untouched.
	HexQuantity,
}

impl ParamCodec {
	fn apply(&self, value: String) -> String {
		match self {
			Self::HexQuantity => {
				if value.starts_with("0x") || value.starts_with("0X") {
					value
				} else if let Ok(quantity) = value.parse::<u64>() {
					format!("0x{:x}", quantity)
				} else {
					value
				}
			}
		}
	}
}

/// Declarative description of one logical method on one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
	verb: HttpVerb,
	path: String,
	query: Vec<(String, String)>,
	param_map: Vec<(String, String)>,
	path_params: Vec<String>,
	codecs: Vec<(String, ParamCodec)>,
	parser: ResponseParser,
	cacheable: bool,
}

impl EndpointSpec {
	/// Starts a GET spec against the given path template
	pub fn get(path: impl Into<String>) -> Self {
		Self {
			verb: HttpVerb::Get,
			path: path.into(),
			query: Vec::new(),
			param_map: Vec::new(),
			path_params: Vec::new(),
			codecs: Vec::new(),
			parser: ResponseParser::Envelope,
			cacheable: false,
		}
	}

	/// Starts a POST spec against the given path template
	pub fn post(path: impl Into<String>) -> Self {
		Self {
			verb: HttpVerb::Post,
			..Self::get(path)
		}
	}

	/// Adds a static query pair (e.g. `module=account`)
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));
		self
	}

	/// Maps a logical parameter name to its wire name
	pub fn map(mut self, logical: impl Into<String>, wire: impl Into<String>) -> Self {
		self.param_map.push((logical.into(), wire.into()));
		self
	}

	/// Declares a logical parameter as bound into the path template
	pub fn path_param(mut self, logical: impl Into<String>) -> Self {
		self.path_params.push(logical.into());
		self
	}

	/// Forces a wire encoding for one logical parameter
	pub fn codec(mut self, logical: impl Into<String>, codec: ParamCodec) -> Self {
		self.codecs.push((logical.into(), codec));
		self
	}

	/// Sets the response parser
	pub fn parser(mut self, parser: ResponseParser) -> Self {
		self.parser = parser;
		self
	}

	/// Marks the endpoint's result as a function of final blocks
	pub fn cacheable(mut self) -> Self {
		self.cacheable = true;
		self
	}

	/// The parser reading this endpoint's responses
	pub fn response_parser(&self) -> &ResponseParser {
		&self.parser
	}

	/// Whether results may be cached
	pub fn is_cacheable(&self) -> bool {
		self.cacheable
	}

	/// Checks spec invariants: every path placeholder is a declared path
	/// parameter and vice versa, no logical name is bound both into the path
	/// and the query, and wire names are unique within the parameter map.
	/// (Static skeleton keys may repeat a wire name; the caller's value
	/// overrides the default.)
	pub fn validate(&self) -> Result<(), ScannerError> {
		for placeholder in placeholders(&self.path) {
			if !self.path_params.iter().any(|p| p == &placeholder) {
				return Err(ScannerError::invalid_argument(
					format!(
						"path placeholder '{{{}}}' is not declared as a path parameter",
						placeholder
					),
					None,
				));
			}
		}
		for param in &self.path_params {
			if !self.path.contains(&format!("{{{}}}", param)) {
				return Err(ScannerError::invalid_argument(
					format!("path parameter '{}' has no placeholder in the path", param),
					None,
				));
			}
		}

		let mut wire_names: Vec<&str> = Vec::with_capacity(self.param_map.len());
		for (logical, wire) in &self.param_map {
			if self.path_params.iter().any(|p| p == logical) {
				return Err(ScannerError::invalid_argument(
					format!(
						"parameter '{}' is bound both into the path and the query",
						logical
					),
					None,
				));
			}
			if wire_names.contains(&wire.as_str()) {
				return Err(ScannerError::invalid_argument(
					format!("wire name '{}' collides within the spec", wire),
					None,
				));
			}
			wire_names.push(wire);
		}
		Ok(())
	}

	/// Interprets the spec for one call: renames parameters, substitutes path
	/// tokens and merges the static query skeleton.
	///
	/// Null-valued parameters are dropped. Logical names missing from the
	/// parameter map are forwarded verbatim, which is how provider-specific
	/// extensions (topic filters, cursors) pass through. Fails before any
	/// network activity when a path placeholder has no value.
	pub fn build(
		&self,
		base_url: &str,
		params: &CallParams,
	) -> Result<PreparedRequest, ScannerError> {
		let mut path = self.path.clone();
		let mut query: Vec<(String, String)> = self.query.clone();

		for (logical, value) in params.iter() {
			if value.is_null() {
				continue;
			}
			let mut encoded = stringify(value);
			if let Some((_, codec)) = self.codecs.iter().find(|(name, _)| name == logical) {
				encoded = codec.apply(encoded);
			}

			if self.path_params.iter().any(|p| p == logical) {
				path = path.replace(
					&format!("{{{}}}", logical),
					&percent_encode(&encoded),
				);
			} else {
				let wire = self
					.param_map
					.iter()
					.find(|(name, _)| name == logical)
					.map(|(_, wire)| wire.clone())
					.unwrap_or_else(|| logical.clone());
				query.retain(|(k, _)| *k != wire);
				query.push((wire, encoded));
			}
		}

		if let Some(unfilled) = placeholders(&path).into_iter().next() {
			return Err(ScannerError::invalid_argument(
				format!("missing value for path parameter '{}'", unfilled),
				None,
			));
		}

		Ok(PreparedRequest {
			verb: self.verb,
			url: format!("{}{}", base_url.trim_end_matches('/'), path),
			query,
			headers: Vec::new(),
			body: None,
		})
	}
}

/// A request ready for the HTTP port, produced by the interpreter and
/// finalized (auth, chain selection) by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
	pub verb: HttpVerb,
	pub url: String,
	pub query: Vec<(String, String)>,
	pub headers: Vec<(String, String)>,
	pub body: Option<Value>,
}

/// Extracts `{name}` placeholders from a path template
fn placeholders(path: &str) -> Vec<String> {
	let mut found = Vec::new();
	let mut rest = path;
	while let Some(open) = rest.find('{') {
		let Some(close) = rest[open..].find('}') else {
			break;
		};
		found.push(rest[open + 1..open + close].to_string());
		rest = &rest[open + close + 1..];
	}
	found
}

fn stringify(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Percent-encodes a path segment (RFC 3986 unreserved characters pass through)
fn percent_encode(segment: &str) -> String {
	let mut out = String::with_capacity(segment.len());
	for byte in segment.bytes() {
		match byte {
			b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
				out.push(byte as char)
			}
			other => out.push_str(&format!("%{:02X}", other)),
		}
	}
	out
}
