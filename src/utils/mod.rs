//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used
//! across the crate:
//!
//! - http: Retry-capable HTTP client construction and connection settings
//! - logging: Structured error context and trace-id plumbing
//! - parsing: String normalization and hex/decimal quantity parsing
//! - tests: Test builders and helpers

pub mod http;
pub mod logging;
pub mod parsing;
pub mod tests;

pub use http::*;
pub use parsing::*;
