//! Secret handling for provider credentials.
//!
//! API keys are caller supplied and held in a [`SecretString`], which zeroizes
//! its backing memory on drop and redacts itself in `Debug`/`Display` output so
//! keys never leak into logs or error chains.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string type that automatically zeroizes its contents when dropped.
///
/// Used for API keys and any other sensitive value handed to a scanner. The
/// value is only reachable through [`SecretString::as_str`]; formatting
/// produces a redaction marker instead of the secret.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
	/// Creates a new `SecretString` from the given value
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the secret value.
	///
	/// The caller must not persist or log the returned slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true when the secret is the empty string
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(REDACTED)")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "REDACTED")
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl Eq for SecretString {}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
