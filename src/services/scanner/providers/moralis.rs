//! Moralis Web3 Data API provider table.
//!
//! REST-shaped endpoints under a single host: the address, transaction hash or
//! block number travels in the path, the chain as a hex id in the query, the
//! credential in an `X-API-Key` header. Responses are plain JSON; field-pick
//! parsers extract the logical value where the payload nests it.

use std::collections::HashMap;

use crate::{
	models::{ChainInfo, LogicalMethod, ProviderFamily, SecretString},
	services::scanner::{AuthMode, EndpointSpec, ResponseParser, Scanner, ScannerError},
};

const BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";

fn moralis_specs() -> HashMap<LogicalMethod, EndpointSpec> {
	let mut specs = HashMap::new();

	specs.insert(
		LogicalMethod::AccountBalance,
		EndpointSpec::get("/{address}/balance")
			.path_param("address")
			.parser(ResponseParser::Field("balance")),
	);
	specs.insert(
		LogicalMethod::AccountTransactions,
		EndpointSpec::get("/{address}")
			.path_param("address")
			.query("limit", "100")
			.parser(ResponseParser::Field("result")),
	);
	specs.insert(
		LogicalMethod::AccountErc20Transfers,
		EndpointSpec::get("/{address}/erc20/transfers")
			.path_param("address")
			.query("limit", "100")
			.parser(ResponseParser::Field("result")),
	);
	specs.insert(
		LogicalMethod::TokenBalance,
		EndpointSpec::get("/{address}/erc20")
			.path_param("address")
			.map("contract_address", "token_addresses")
			.parser(ResponseParser::Direct),
	);
	specs.insert(
		LogicalMethod::TxByHash,
		EndpointSpec::get("/transaction/{txhash}")
			.path_param("txhash")
			.parser(ResponseParser::Direct)
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::BlockByNumber,
		EndpointSpec::get("/block/{block_number}")
			.path_param("block_number")
			.parser(ResponseParser::Direct)
			.cacheable(),
	);
	specs.insert(
		LogicalMethod::ContractAbi,
		EndpointSpec::get("/{address}/abi")
			.path_param("address")
			.parser(ResponseParser::Direct)
			.cacheable(),
	);

	debug_assert!(specs.values().all(|s| s.validate().is_ok()));
	specs
}

/// Factory for the Moralis deep-index API
pub fn moralis_v1(
	chain: &ChainInfo,
	api_key: Option<SecretString>,
) -> Result<Scanner, ScannerError> {
	let hex_chain_id = chain.moralis_chain_id.as_deref().ok_or_else(|| {
		ScannerError::chain_not_supported(
			format!(
				"chain '{}' (id {}) is not supported by Moralis",
				chain.display_name, chain.chain_id
			),
			Some(HashMap::from([(
				"provider".to_string(),
				"moralis".to_string(),
			)])),
		)
	})?;

	let Some(api_key) = api_key else {
		return Err(ScannerError::auth_required(
			"Moralis requires an API key",
			Some(HashMap::from([(
				"provider".to_string(),
				"moralis".to_string(),
			)])),
		));
	};

	Ok(Scanner::new(
		"moralis",
		"v1",
		ProviderFamily::Moralis,
		AuthMode::Header("X-API-Key"),
		Some(api_key),
		chain.clone(),
		BASE_URL.to_string(),
		vec![("chain".to_string(), hex_chain_id.to_string())],
		moralis_specs(),
	))
}
