//! Parsing utilities
//!
//! This module provides utilities for parsing various types of data.

use serde_json::Value;

/// Normalizes a string by trimming whitespace and converting to lowercase.
///
/// This is useful for case-insensitive comparisons and removing leading/trailing whitespace.
///
/// # Arguments
/// * `input` - The string to normalize
///
/// # Returns
/// * `String` - The normalized string (trimmed and lowercase)
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}

/// Parses a numeric quantity from a JSON value.
///
/// Explorer APIs are inconsistent about numeric encodings: the same field may
/// arrive as a JSON number, a decimal string (`"123"`), or a 0x-prefixed hex
/// string (`"0x7b"`). All three forms are accepted and compared numerically.
///
/// # Arguments
/// * `value` - The JSON value to parse
///
/// # Returns
/// * `Option<u64>` - The parsed quantity, or None if the value is not numeric
pub fn parse_quantity(value: &Value) -> Option<u64> {
	match value {
		Value::Number(n) => n.as_u64(),
		Value::String(s) => parse_quantity_str(s),
		_ => None,
	}
}

/// Parses a numeric quantity from a string, accepting decimal and 0x-prefixed
/// hex encodings.
pub fn parse_quantity_str(s: &str) -> Option<u64> {
	let s = s.trim();
	if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		u64::from_str_radix(hex, 16).ok()
	} else {
		s.parse::<u64>().ok()
	}
}
