//! Chain metadata and provider mapping hints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The provider families a chain can be mapped onto.
///
/// Each family corresponds to one hint slot on [`ChainInfo`]; a chain is
/// supported by a family exactly when the matching hint is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
	/// Etherscan-family query APIs (etherscan.io, bscscan.com, ...)
	Etherscan,
	/// Self-hosted or hosted Blockscout instances
	Blockscout,
	/// Moralis-style REST Web3 data APIs
	Moralis,
}

impl fmt::Display for ProviderFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Etherscan => "etherscan",
			Self::Blockscout => "blockscout",
			Self::Moralis => "moralis",
		};
		write!(f, "{}", name)
	}
}

/// Etherscan-family mapping hint: which API domain family serves the chain and
/// under which network code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtherscanHint {
	/// API kind selecting the domain (e.g. `eth` -> etherscan.io, `bsc` -> bscscan.com)
	pub api_kind: String,
	/// Network code within the domain (`main`, `sepolia`, ...)
	pub network: String,
}

impl EtherscanHint {
	pub fn new(api_kind: impl Into<String>, network: impl Into<String>) -> Self {
		Self {
			api_kind: api_kind.into(),
			network: network.into(),
		}
	}
}

/// Immutable metadata describing one EVM chain.
///
/// Loaded once into the chain registry at startup; never mutated afterwards.
/// The per-provider hints drive adapter construction: a hint is present if and
/// only if the corresponding provider family supports the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
	/// EIP-155 chain id, unique across the registry
	pub chain_id: u64,
	/// Canonical short name, lowercase (e.g. `eth`)
	pub name: String,
	/// Human-readable display name (e.g. `Ethereum Mainnet`)
	pub display_name: String,
	/// Alternative lowercase names resolving to this chain
	pub aliases: Vec<String>,
	/// Native currency ticker
	pub currency: String,
	/// Whether the chain is a test network
	pub is_testnet: bool,
	/// Etherscan-family mapping, when supported
	pub etherscan: Option<EtherscanHint>,
	/// Blockscout instance hostname, when supported
	pub blockscout_instance: Option<String>,
	/// Moralis chain id as a 0x-prefixed hex string, when supported
	pub moralis_chain_id: Option<String>,
}

impl ChainInfo {
	/// Whether the given provider family has a mapping hint for this chain
	pub fn supports(&self, family: ProviderFamily) -> bool {
		match family {
			ProviderFamily::Etherscan => self.etherscan.is_some(),
			ProviderFamily::Blockscout => self.blockscout_instance.is_some(),
			ProviderFamily::Moralis => self.moralis_chain_id.is_some(),
		}
	}
}

/// A caller-supplied reference to a chain: numeric id or name/alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainRef {
	/// EIP-155 chain id
	Id(u64),
	/// Canonical name or alias, matched case-insensitively
	Name(String),
}

impl From<u64> for ChainRef {
	fn from(id: u64) -> Self {
		Self::Id(id)
	}
}

impl From<&str> for ChainRef {
	fn from(name: &str) -> Self {
		Self::Name(name.to_string())
	}
}

impl From<String> for ChainRef {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl fmt::Display for ChainRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Id(id) => write!(f, "{}", id),
			Self::Name(name) => write!(f, "{}", name),
		}
	}
}
