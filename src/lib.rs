//! Multi-provider client for EVM blockchain explorer APIs.
//!
//! This library unifies heterogeneous explorer services (the Etherscan
//! family, Blockscout instances and Moralis-style REST APIs) behind one
//! logical method surface, and provides a bulk harvester that collects every
//! record over large block ranges despite per-page row ceilings. It includes:
//!
//! - A chain registry resolving ids, names and aliases to canonical metadata
//! - Data-driven provider adapters described by endpoint specification tables
//! - A unified client composing rate limiting, retries, caching and telemetry
//! - A range-splitting aggregator with bounded concurrency and cooperative
//!   cancellation
//!
//! # Module Structure
//!
//! - `models`: Data structures for chains, methods, parameters and secrets
//! - `repositories`: Read-only chain and provider registries
//! - `services`: Scanners, the unified client, the aggregator and the
//!   infrastructure ports
//! - `utils`: Common utilities and helper functions
//!
//! # Example
//!
//! ```no_run
//! use chainscan::{
//!     models::{CallParams, LogicalMethod},
//!     services::client::ChainscanClient,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChainscanClient::builder("etherscan", "v2")
//!     .chain("eth")
//!     .api_key("YourApiKeyToken")
//!     .build()?;
//!
//! let balance = client
//!     .call(
//!         LogicalMethod::AccountBalance,
//!         CallParams::new().with("address", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
//!     )
//!     .await?;
//! println!("{balance}");
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
