//! Chain registry implementation.
//!
//! Answers "given this caller-supplied chain reference, what is the canonical
//! [`ChainInfo`]?" and "list chains filtered by provider support and testnet
//! flag". The registry is built once at startup from the bundled catalogue
//! (or an explicit list in tests) and is read-only afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::{
	models::{ChainInfo, ChainRef, EtherscanHint, ProviderFamily},
	repositories::error::RegistryError,
	utils::normalize_string,
};

/// Maximum number of closest-match suggestions attached to resolution failures
const MAX_SUGGESTIONS: usize = 3;

/// Read-only catalogue of chains, indexed by id, canonical name and alias.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
	chains: Vec<ChainInfo>,
	by_id: HashMap<u64, usize>,
	by_name: HashMap<String, usize>,
	by_alias: HashMap<String, usize>,
}

impl ChainRegistry {
	/// Builds a registry from a list of chains, validating catalogue
	/// invariants: unique chain ids, unique canonical names, and aliases that
	/// resolve to exactly one chain.
	pub fn new(chains: Vec<ChainInfo>) -> Result<Self, RegistryError> {
		let mut by_id = HashMap::new();
		let mut by_name = HashMap::new();
		let mut by_alias = HashMap::new();

		for (index, chain) in chains.iter().enumerate() {
			if by_id.insert(chain.chain_id, index).is_some() {
				return Err(RegistryError::invalid_catalogue(
					format!("duplicate chain id {}", chain.chain_id),
					None,
				));
			}
			let name = normalize_string(&chain.name);
			if by_name.insert(name.clone(), index).is_some() {
				return Err(RegistryError::invalid_catalogue(
					format!("duplicate chain name '{}'", name),
					None,
				));
			}
		}

		// Aliases may not collide with each other nor shadow a canonical name
		for (index, chain) in chains.iter().enumerate() {
			for alias in &chain.aliases {
				let alias = normalize_string(alias);
				if by_name.contains_key(&alias) && by_name[&alias] != index {
					return Err(RegistryError::invalid_catalogue(
						format!("alias '{}' shadows another chain's name", alias),
						None,
					));
				}
				if let Some(existing) = by_alias.insert(alias.clone(), index) {
					if existing != index {
						return Err(RegistryError::invalid_catalogue(
							format!("duplicate alias '{}'", alias),
							None,
						));
					}
				}
			}
		}

		Ok(Self {
			chains,
			by_id,
			by_name,
			by_alias,
		})
	}

	/// Returns the process-wide registry over the bundled catalogue.
	///
	/// The bundled catalogue is statically known to be consistent; tests cover
	/// its invariants, so construction cannot fail here.
	pub fn bundled() -> &'static ChainRegistry {
		static REGISTRY: OnceLock<ChainRegistry> = OnceLock::new();
		REGISTRY.get_or_init(|| {
			ChainRegistry::new(bundled_chains()).expect("bundled chain catalogue is consistent")
		})
	}

	/// Resolves a chain reference to its canonical [`ChainInfo`].
	///
	/// Resolution order: numeric id, then canonical name (case-insensitive),
	/// then alias. Failures carry the input verbatim plus the closest
	/// catalogued names by case-insensitive prefix.
	pub fn resolve(&self, reference: &ChainRef) -> Result<&ChainInfo, RegistryError> {
		match reference {
			ChainRef::Id(id) => self
				.by_id
				.get(id)
				.map(|&i| &self.chains[i])
				.ok_or_else(|| RegistryError::unknown_chain(id.to_string(), &[])),
			ChainRef::Name(name) => {
				let needle = normalize_string(name);
				if let Some(&i) = self.by_name.get(&needle) {
					return Ok(&self.chains[i]);
				}
				if let Some(&i) = self.by_alias.get(&needle) {
					return Ok(&self.chains[i]);
				}
				Err(RegistryError::unknown_chain(
					name.clone(),
					&self.suggestions(&needle),
				))
			}
		}
	}

	/// Lists chains, optionally filtered by provider support and testnet flag
	pub fn list(&self, family: Option<ProviderFamily>, testnet: Option<bool>) -> Vec<&ChainInfo> {
		self.chains
			.iter()
			.filter(|c| family.map_or(true, |f| c.supports(f)))
			.filter(|c| testnet.map_or(true, |t| c.is_testnet == t))
			.collect()
	}

	/// All catalogued chains
	pub fn all(&self) -> &[ChainInfo] {
		&self.chains
	}

	/// Closest catalogued names and aliases sharing a prefix with the input,
	/// best matches first
	fn suggestions(&self, needle: &str) -> Vec<String> {
		let mut scored: Vec<(usize, &String)> = self
			.by_name
			.keys()
			.chain(self.by_alias.keys())
			.filter_map(|candidate| {
				let shared = common_prefix_len(candidate, needle);
				(shared > 0).then_some((shared, candidate))
			})
			.collect();

		scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
		scored
			.into_iter()
			.map(|(_, name)| name.clone())
			.take(MAX_SUGGESTIONS)
			.collect()
	}
}

fn common_prefix_len(a: &str, b: &str) -> usize {
	a.chars()
		.zip(b.chars())
		.take_while(|(x, y)| x == y)
		.count()
}

/// The bundled chain catalogue.
///
/// Regenerated from the community chain list; hints reflect official provider
/// support: Etherscan API v2 domains, public Blockscout instances and the
/// Moralis chain set.
fn bundled_chains() -> Vec<ChainInfo> {
	fn chain(
		chain_id: u64,
		name: &str,
		display_name: &str,
		aliases: &[&str],
		currency: &str,
		is_testnet: bool,
		etherscan: Option<EtherscanHint>,
		blockscout_instance: Option<&str>,
		moralis_chain_id: Option<&str>,
	) -> ChainInfo {
		ChainInfo {
			chain_id,
			name: name.to_string(),
			display_name: display_name.to_string(),
			aliases: aliases.iter().map(|a| a.to_string()).collect(),
			currency: currency.to_string(),
			is_testnet,
			etherscan,
			blockscout_instance: blockscout_instance.map(|h| h.to_string()),
			moralis_chain_id: moralis_chain_id.map(|h| h.to_string()),
		}
	}

	vec![
		chain(
			1,
			"eth",
			"Ethereum Mainnet",
			&["ethereum", "mainnet", "main"],
			"ETH",
			false,
			Some(EtherscanHint::new("eth", "main")),
			Some("eth.blockscout.com"),
			Some("0x1"),
		),
		chain(
			11155111,
			"sepolia",
			"Ethereum Sepolia",
			&["eth-sepolia"],
			"ETH",
			true,
			Some(EtherscanHint::new("eth", "sepolia")),
			Some("eth-sepolia.blockscout.com"),
			Some("0xaa36a7"),
		),
		chain(
			17000,
			"holesky",
			"Ethereum Holesky",
			&["eth-holesky"],
			"ETH",
			true,
			Some(EtherscanHint::new("eth", "holesky")),
			None,
			None,
		),
		chain(
			10,
			"optimism",
			"OP Mainnet",
			&["op", "optimistic-ethereum"],
			"ETH",
			false,
			Some(EtherscanHint::new("optimism", "main")),
			Some("optimism.blockscout.com"),
			Some("0xa"),
		),
		chain(
			56,
			"bsc",
			"BNB Smart Chain",
			&["binance", "bnb"],
			"BNB",
			false,
			Some(EtherscanHint::new("bsc", "main")),
			None,
			Some("0x38"),
		),
		chain(
			100,
			"gnosis",
			"Gnosis Chain",
			&["xdai"],
			"XDAI",
			false,
			Some(EtherscanHint::new("gnosis", "main")),
			Some("gnosis.blockscout.com"),
			Some("0x64"),
		),
		chain(
			137,
			"polygon",
			"Polygon Mainnet",
			&["matic"],
			"POL",
			false,
			Some(EtherscanHint::new("polygon", "main")),
			None,
			Some("0x89"),
		),
		chain(
			250,
			"fantom",
			"Fantom Opera",
			&["ftm"],
			"FTM",
			false,
			Some(EtherscanHint::new("fantom", "main")),
			None,
			Some("0xfa"),
		),
		chain(
			8453,
			"base",
			"Base Mainnet",
			&[],
			"ETH",
			false,
			Some(EtherscanHint::new("base", "main")),
			Some("base.blockscout.com"),
			Some("0x2105"),
		),
		chain(
			42161,
			"arbitrum",
			"Arbitrum One",
			&["arb", "arbitrum-one"],
			"ETH",
			false,
			Some(EtherscanHint::new("arbitrum", "main")),
			Some("arbitrum.blockscout.com"),
			Some("0xa4b1"),
		),
		chain(
			43114,
			"avalanche",
			"Avalanche C-Chain",
			&["avax"],
			"AVAX",
			false,
			Some(EtherscanHint::new("avalanche", "main")),
			None,
			Some("0xa86a"),
		),
		chain(
			59144,
			"linea",
			"Linea Mainnet",
			&[],
			"ETH",
			false,
			Some(EtherscanHint::new("linea", "main")),
			None,
			Some("0xe708"),
		),
		chain(
			81457,
			"blast",
			"Blast Mainnet",
			&[],
			"ETH",
			false,
			Some(EtherscanHint::new("blast", "main")),
			None,
			None,
		),
		chain(
			534352,
			"scroll",
			"Scroll Mainnet",
			&[],
			"ETH",
			false,
			Some(EtherscanHint::new("scroll", "main")),
			Some("scroll.blockscout.com"),
			None,
		),
	]
}
