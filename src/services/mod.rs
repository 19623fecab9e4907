//! Core services for explorer access.
//!
//! This module contains the main business logic of the crate:
//!
//! - `scanner`: Provider adapters binding logical methods to HTTP requests
//! - `client`: The unified client orchestrating one call end to end
//! - `aggregator`: Bulk range-splitting collection over block intervals
//! - `transport`: The HTTP port and its retry-capable production client
//! - `ratelimit`: Token-bucket request gating
//! - `cache`: Optional response caching for finality-safe methods
//! - `telemetry`: Structured call events

pub mod aggregator;
pub mod cache;
pub mod client;
pub mod ratelimit;
pub mod scanner;
pub mod telemetry;
pub mod transport;
