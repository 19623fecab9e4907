//! Read-only registries resolving caller references to concrete metadata.
//!
//! - `chain`: the chain catalogue and its resolution rules
//! - `provider`: scanner factories by (provider, version)
//!
//! Both registries are initialized once at startup and never mutated; tests
//! substitute them by explicit injection at the client construction boundary.

mod chain;
mod error;
mod provider;

pub use chain::ChainRegistry;
pub use error::RegistryError;
pub use provider::{ProviderRegistry, ScannerFactory};
