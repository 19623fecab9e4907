//! Response parsers.
//!
//! A parser is a pure function from a provider payload to a logical result.
//! The closed set below covers every wire shape the bundled providers speak;
//! endpoint specifications reference one of these by value.

use serde_json::{json, Value};
use std::collections::HashMap;

use crate::services::scanner::error::ScannerError;

/// Envelope messages that mean "successful query, zero rows". The Etherscan
/// family reports these with `status: "0"`, indistinguishable from real
/// failures except by message prefix.
const EMPTY_RESULT_PREFIXES: [&str; 2] = ["No transactions found", "No records found"];

/// The closed set of payload shapes understood by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseParser {
	/// Etherscan-family `{status, message, result}` envelope, including the
	/// JSON-RPC shape returned by `module=proxy` actions
	Envelope,
	/// The payload is returned as received
	Direct,
	/// A single field is extracted from the payload; nested fields use a
	/// dotted path (e.g. `"result.balance"`)
	Field(&'static str),
}

impl ResponseParser {
	/// Applies the parser to a decoded payload.
	///
	/// Returns the logical result, or a provider/parse error. The provider's
	/// own message is preserved verbatim on provider errors.
	pub fn parse(&self, payload: Value) -> Result<Value, ScannerError> {
		match self {
			Self::Envelope => parse_envelope(payload),
			Self::Direct => Ok(payload),
			Self::Field(path) => pick_field(payload, path),
		}
	}
}

fn parse_envelope(payload: Value) -> Result<Value, ScannerError> {
	let Some(object) = payload.as_object() else {
		return Err(ScannerError::parse(
			format!("expected an envelope object, got: {}", type_name(&payload)),
			None,
			None,
		));
	};

	if let Some(status) = object.get("status").and_then(Value::as_str) {
		let message = object.get("message").and_then(Value::as_str).unwrap_or("");
		if status == "1" {
			return object.get("result").cloned().ok_or_else(|| {
				ScannerError::parse("envelope with status 1 is missing 'result'", None, None)
			});
		}

		// A zero status with a known message prefix is an empty success, not
		// an error. Everything else is a provider-signaled failure.
		if EMPTY_RESULT_PREFIXES.iter().any(|p| message.starts_with(p)) {
			return Ok(json!([]));
		}

		let result = object.get("result");
		let raw = result
			.and_then(Value::as_str)
			.filter(|s| !s.is_empty())
			.unwrap_or(message);
		return Err(ScannerError::provider(
			raw,
			Some(HashMap::from([(
				"message".to_string(),
				message.to_string(),
			)])),
		));
	}

	// JSON-RPC shape from proxy actions: {"error": {code, message}} on
	// failure, {"result": ...} on success
	if let Some(error) = object.get("error") {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown JSON-RPC error");
		return Err(ScannerError::provider(
			message,
			Some(HashMap::from([("code".to_string(), code.to_string())])),
		));
	}

	if let Some(result) = object.get("result") {
		return Ok(result.clone());
	}

	Err(ScannerError::parse(
		"payload has neither 'status', 'error' nor 'result'",
		None,
		None,
	))
}

fn pick_field(payload: Value, path: &str) -> Result<Value, ScannerError> {
	let mut current = &payload;
	for segment in path.split('.') {
		current = current.get(segment).ok_or_else(|| {
			ScannerError::parse(
				format!("response is missing field '{}'", path),
				None,
				None,
			)
		})?;
	}
	Ok(current.clone())
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
