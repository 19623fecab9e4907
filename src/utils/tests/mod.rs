//! Test helper utilities
//!
//! This module contains test helper utilities for the crate.
//!
//! - `builders`: Test helper utilities for creating test instances of models
//! - `http`: Test helper utilities for creating HTTP clients

pub mod builders {
	pub mod chain;
}


pub use http::*;
