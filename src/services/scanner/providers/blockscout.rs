//! Blockscout provider table.
//!
//! Blockscout instances speak the Etherscan-compatible API under their own
//! host, so the adapter is the Etherscan family table with the base URL
//! overridden and the endpoints Blockscout does not serve removed. Instances
//! work without credentials; an API key, when supplied, travels as the usual
//! `apikey` query parameter.

use std::collections::HashMap;

use crate::{
	models::{ChainInfo, LogicalMethod, ProviderFamily, SecretString},
	services::scanner::{providers::etherscan, AuthMode, Scanner, ScannerError},
};

/// Etherscan-family endpoints that Blockscout does not serve
const UNSUPPORTED: [LogicalMethod; 1] = [LogicalMethod::GasOracle];

/// Factory for Blockscout instances
pub fn blockscout_v1(
	chain: &ChainInfo,
	api_key: Option<SecretString>,
) -> Result<Scanner, ScannerError> {
	let host = chain.blockscout_instance.as_deref().ok_or_else(|| {
		ScannerError::chain_not_supported(
			format!(
				"chain '{}' (id {}) has no known Blockscout instance",
				chain.display_name, chain.chain_id
			),
			Some(HashMap::from([(
				"provider".to_string(),
				"blockscout".to_string(),
			)])),
		)
	})?;

	let mut specs = etherscan::family_specs("/api");
	for method in UNSUPPORTED {
		specs.remove(&method);
	}

	Ok(Scanner::new(
		"blockscout",
		"v1",
		ProviderFamily::Blockscout,
		AuthMode::Query("apikey"),
		api_key,
		chain.clone(),
		format!("https://{}", host),
		Vec::new(),
		specs,
	))
}
