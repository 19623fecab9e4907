//! Provider registry implementation.
//!
//! A process-wide mapping from `(provider name, version)` to a scanner
//! factory. The registry holds constructors, never instances; scanners are
//! instantiated per client for a concrete chain and credential.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::{
	models::{ChainInfo, SecretString},
	repositories::error::RegistryError,
	services::scanner::{providers, Scanner, ScannerError},
};

/// Constructor binding a provider implementation to a chain and credential
pub type ScannerFactory =
	fn(&ChainInfo, Option<SecretString>) -> Result<Scanner, ScannerError>;

/// Read-only lookup of scanner factories by provider name and version.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
	factories: BTreeMap<(String, String), ScannerFactory>,
}

impl ProviderRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a factory under a (name, version) pair, replacing any
	/// previous registration
	pub fn register(
		&mut self,
		name: impl Into<String>,
		version: impl Into<String>,
		factory: ScannerFactory,
	) {
		self.factories
			.insert((name.into(), version.into()), factory);
	}

	/// Returns the process-wide registry with all built-in providers
	pub fn bundled() -> &'static ProviderRegistry {
		static REGISTRY: OnceLock<ProviderRegistry> = OnceLock::new();
		REGISTRY.get_or_init(|| {
			let mut registry = ProviderRegistry::new();
			registry.register("etherscan", "v1", providers::etherscan_v1);
			registry.register("etherscan", "v2", providers::etherscan_v2);
			registry.register("blockscout", "v1", providers::blockscout_v1);
			registry.register("moralis", "v1", providers::moralis_v1);
			registry
		})
	}

	/// Looks up the factory for a provider, failing with `UnknownProvider`
	/// when nothing is registered under the pair
	pub fn get(&self, name: &str, version: &str) -> Result<ScannerFactory, RegistryError> {
		self.factories
			.get(&(name.to_string(), version.to_string()))
			.copied()
			.ok_or_else(|| {
				RegistryError::unknown_provider(name, version, &self.provider_names())
			})
	}

	/// Lists registered `(name, version)` pairs in lexical order
	pub fn providers(&self) -> Vec<(String, String)> {
		self.factories.keys().cloned().collect()
	}

	fn provider_names(&self) -> Vec<String> {
		self.factories
			.keys()
			.map(|(name, version)| format!("{} {}", name, version))
			.collect()
	}
}
