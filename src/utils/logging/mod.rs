//! Structured error context and trace-id plumbing.
//!
//! The crate is a library, so it never installs a `tracing` subscriber itself;
//! it only emits structured events. Embedding applications choose the
//! subscriber and its output format.

pub mod error;

pub use error::{ErrorContext, TraceableError};
