//! Test helper utilities for chain metadata
//!
//! - `ChainInfoBuilder`: Builder for creating test ChainInfo instances

use crate::models::{ChainInfo, EtherscanHint};

/// Builder for creating test ChainInfo instances
pub struct ChainInfoBuilder {
	chain_id: u64,
	name: String,
	display_name: String,
	aliases: Vec<String>,
	currency: String,
	is_testnet: bool,
	etherscan: Option<EtherscanHint>,
	blockscout_instance: Option<String>,
	moralis_chain_id: Option<String>,
}

impl Default for ChainInfoBuilder {
	fn default() -> Self {
		Self {
			chain_id: 1,
			name: "eth".to_string(),
			display_name: "Ethereum Mainnet".to_string(),
			aliases: vec!["ethereum".to_string()],
			currency: "ETH".to_string(),
			is_testnet: false,
			etherscan: None,
			blockscout_instance: None,
			moralis_chain_id: None,
		}
	}
}

impl ChainInfoBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self.display_name = name.to_string();
		self
	}

	pub fn display_name(mut self, display_name: &str) -> Self {
		self.display_name = display_name.to_string();
		self
	}

	pub fn aliases(mut self, aliases: &[&str]) -> Self {
		self.aliases = aliases.iter().map(|a| a.to_string()).collect();
		self
	}

	pub fn currency(mut self, currency: &str) -> Self {
		self.currency = currency.to_string();
		self
	}

	pub fn testnet(mut self, is_testnet: bool) -> Self {
		self.is_testnet = is_testnet;
		self
	}

	pub fn etherscan(mut self, api_kind: &str, network: &str) -> Self {
		self.etherscan = Some(EtherscanHint::new(api_kind, network));
		self
	}

	pub fn blockscout(mut self, instance: &str) -> Self {
		self.blockscout_instance = Some(instance.to_string());
		self
	}

	pub fn moralis(mut self, hex_chain_id: &str) -> Self {
		self.moralis_chain_id = Some(hex_chain_id.to_string());
		self
	}

	pub fn build(self) -> ChainInfo {
		ChainInfo {
			chain_id: self.chain_id,
			name: self.name,
			display_name: self.display_name,
			aliases: self.aliases,
			currency: self.currency,
			is_testnet: self.is_testnet,
			etherscan: self.etherscan,
			blockscout_instance: self.blockscout_instance,
			moralis_chain_id: self.moralis_chain_id,
		}
	}
}
