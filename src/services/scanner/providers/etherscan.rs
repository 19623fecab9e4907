//! Etherscan-family provider tables.
//!
//! Two generations share one endpoint table:
//!
//! - v1 uses a per-chain host derived from the chain's Etherscan hint
//!   (`api.etherscan.io`, `api-sepolia.etherscan.io`, `api.bscscan.com`, ...)
//! - v2 uses the single multichain host with a `chainid` query parameter; one
//!   API key is valid for every supported chain
//!
//! Both authenticate with an `apikey` query parameter, which is optional (the
//! provider throttles keyless calls instead of rejecting them).

use std::collections::HashMap;

use crate::{
	models::{ChainInfo, LogicalMethod, ProviderFamily, SecretString},
	services::scanner::{
		AuthMode, EndpointSpec, ParamCodec, ResponseParser, Scanner, ScannerError,
	},
};

/// The shared Etherscan-compatible endpoint table.
///
/// `api_path` differs between generations (`/api` vs `/v2/api`) and between
/// deployments (Blockscout serves the same shapes under its own host).
pub(crate) fn family_specs(api_path: &str) -> HashMap<LogicalMethod, EndpointSpec> {
	let mut specs = HashMap::new();

	specs.insert(
		LogicalMethod::AccountBalance,
		EndpointSpec::get(api_path)
			.query("module", "account")
			.query("action", "balance")
			.query("tag", "latest")
			.map("address", "address"),
	);
	specs.insert(
		LogicalMethod::AccountTransactions,
		EndpointSpec::get(api_path)
			.query("module", "account")
			.query("action", "txlist")
			.map("address", "address")
			.map("start_block", "startblock")
			.map("end_block", "endblock")
			.map("page", "page")
			.map("offset", "offset")
			.map("sort", "sort"),
	);
	specs.insert(
		LogicalMethod::AccountInternalTransactions,
		EndpointSpec::get(api_path)
			.query("module", "account")
			.query("action", "txlistinternal")
			.map("address", "address")
			.map("start_block", "startblock")
			.map("end_block", "endblock")
			.map("page", "page")
			.map("offset", "offset")
			.map("sort", "sort"),
	);
	specs.insert(
		LogicalMethod::AccountErc20Transfers,
		EndpointSpec::get(api_path)
			.query("module", "account")
			.query("action", "tokentx")
			.map("address", "address")
			.map("contract_address", "contractaddress")
			.map("start_block", "startblock")
			.map("end_block", "endblock")
			.map("page", "page")
			.map("offset", "offset")
			.map("sort", "sort"),
	);
	specs.insert(
		LogicalMethod::TokenBalance,
		EndpointSpec::get(api_path)
			.query("module", "account")
			.query("action", "tokenbalance")
			.query("tag", "latest")
			.map("address", "address")
			.map("contract_address", "contractaddress"),
	);
	specs.insert(
		LogicalMethod::TxByHash,
		EndpointSpec::get(api_path)
			.query("module", "proxy")
			.query("action", "eth_getTransactionByHash")
			.map("txhash", "txhash")
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::TxReceiptStatus,
		EndpointSpec::get(api_path)
			.query("module", "transaction")
			.query("action", "gettxreceiptstatus")
			.map("txhash", "txhash")
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::BlockByNumber,
		EndpointSpec::get(api_path)
			.query("module", "proxy")
			.query("action", "eth_getBlockByNumber")
			.query("boolean", "true")
			.map("block_number", "tag")
			.codec("block_number", ParamCodec::HexQuantity)
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::BlockReward,
		EndpointSpec::get(api_path)
			.query("module", "block")
			.query("action", "getblockreward")
			.map("block_number", "blockno")
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::EventLogs,
		EndpointSpec::get(api_path)
			.query("module", "logs")
			.query("action", "getLogs")
			.map("address", "address")
			.map("start_block", "fromBlock")
			.map("end_block", "toBlock")
			.map("page", "page")
			.map("offset", "offset"),
	);
	specs.insert(
		LogicalMethod::ContractAbi,
		EndpointSpec::get(api_path)
			.query("module", "contract")
			.query("action", "getabi")
			.map("address", "address")
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::ContractSource,
		EndpointSpec::get(api_path)
			.query("module", "contract")
			.query("action", "getsourcecode")
			.map("address", "address")
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::GasOracle,
		EndpointSpec::get(api_path)
			.query("module", "gastracker")
			.query("action", "gasoracle"),
	);
	specs.insert(
		LogicalMethod::EthPrice,
		EndpointSpec::get(api_path)
			.query("module", "stats")
			.query("action", "ethprice"),
	);
	specs.insert(
		LogicalMethod::EthSupply,
		EndpointSpec::get(api_path)
			.query("module", "stats")
			.query("action", "ethsupply"),
	);

	debug_assert!(specs.values().all(|s| s.validate().is_ok()));
	debug_assert!(specs
		.values()
		.all(|s| *s.response_parser() == ResponseParser::Envelope));
	specs
}

/// API domain serving each Etherscan api-kind
fn api_host(api_kind: &str) -> Option<&'static str> {
	match api_kind {
		"eth" => Some("etherscan.io"),
		"optimism" => Some("etherscan.io"),
		"bsc" => Some("bscscan.com"),
		"polygon" => Some("polygonscan.com"),
		"fantom" => Some("ftmscan.com"),
		"arbitrum" => Some("arbiscan.io"),
		"avalanche" => Some("snowscan.xyz"),
		"base" => Some("basescan.org"),
		"gnosis" => Some("gnosisscan.io"),
		"linea" => Some("lineascan.build"),
		"blast" => Some("blastscan.io"),
		"scroll" => Some("scrollscan.com"),
		_ => None,
	}
}

/// Builds the v1 base URL for a chain's Etherscan hint.
///
/// Mainnets live under an `api.` prefix, test networks under `api-{network}.`.
/// Optimism is the historical exception with its `-optimistic` suffix.
fn v1_base_url(chain: &ChainInfo) -> Result<String, ScannerError> {
	let hint = chain.etherscan.as_ref().ok_or_else(|| {
		ScannerError::chain_not_supported(
			format!(
				"chain '{}' (id {}) has no Etherscan mapping",
				chain.display_name, chain.chain_id
			),
			Some(HashMap::from([(
				"provider".to_string(),
				"etherscan".to_string(),
			)])),
		)
	})?;

	let host = api_host(&hint.api_kind).ok_or_else(|| {
		ScannerError::chain_not_supported(
			format!("unknown Etherscan api kind '{}'", hint.api_kind),
			None,
		)
	})?;

	let prefix = match (hint.api_kind.as_str(), hint.network.as_str()) {
		("optimism", "main") => "api-optimistic".to_string(),
		("optimism", network) => format!("api-{}-optimistic", network),
		(_, "main") => "api".to_string(),
		(_, network) => format!("api-{}", network),
	};

	Ok(format!("https://{}.{}", prefix, host))
}

/// Factory for the per-chain v1 API
pub fn etherscan_v1(
	chain: &ChainInfo,
	api_key: Option<SecretString>,
) -> Result<Scanner, ScannerError> {
	let base_url = v1_base_url(chain)?;
	Ok(Scanner::new(
		"etherscan",
		"v1",
		ProviderFamily::Etherscan,
		AuthMode::Query("apikey"),
		api_key,
		chain.clone(),
		base_url,
		Vec::new(),
		family_specs("/api"),
	))
}

/// Factory for the multichain v2 API
pub fn etherscan_v2(
	chain: &ChainInfo,
	api_key: Option<SecretString>,
) -> Result<Scanner, ScannerError> {
	if chain.etherscan.is_none() {
		return Err(ScannerError::chain_not_supported(
			format!(
				"chain '{}' (id {}) has no Etherscan mapping",
				chain.display_name, chain.chain_id
			),
			Some(HashMap::from([(
				"provider".to_string(),
				"etherscan".to_string(),
			)])),
		));
	}

	Ok(Scanner::new(
		"etherscan",
		"v2",
		ProviderFamily::Etherscan,
		AuthMode::Query("apikey"),
		api_key,
		chain.clone(),
		"https://api.etherscan.io".to_string(),
		vec![("chainid".to_string(), chain.chain_id.to_string())],
		family_specs("/v2/api"),
	))
}
