//! The provider-agnostic operation catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical operation offered by explorer providers.
///
/// The set is closed: scanners advertise which of these they implement and map
/// each one to a provider-specific endpoint. Callers never deal in
/// `module`/`action` pairs or REST paths directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalMethod {
	/// Native-currency balance of an address
	AccountBalance,
	/// Normal (external) transactions of an address
	AccountTransactions,
	/// Internal (message-call) transactions of an address
	AccountInternalTransactions,
	/// ERC-20 token transfer events of an address
	AccountErc20Transfers,
	/// ERC-20 token balance of an address for a given contract
	TokenBalance,
	/// Transaction lookup by hash
	TxByHash,
	/// Receipt status of a transaction
	TxReceiptStatus,
	/// Block lookup by number
	BlockByNumber,
	/// Block reward of a block
	BlockReward,
	/// Event logs matching an address/topic filter
	EventLogs,
	/// Verified contract ABI
	ContractAbi,
	/// Verified contract source code
	ContractSource,
	/// Current gas price oracle
	GasOracle,
	/// Native-currency market price
	EthPrice,
	/// Total native-currency supply
	EthSupply,
}

impl LogicalMethod {
	/// Stable dotted name used in telemetry events and cache keys
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AccountBalance => "account.balance",
			Self::AccountTransactions => "account.transactions",
			Self::AccountInternalTransactions => "account.internal_transactions",
			Self::AccountErc20Transfers => "account.erc20_transfers",
			Self::TokenBalance => "token.balance",
			Self::TxByHash => "transaction.by_hash",
			Self::TxReceiptStatus => "transaction.receipt_status",
			Self::BlockByNumber => "block.by_number",
			Self::BlockReward => "block.reward",
			Self::EventLogs => "logs.events",
			Self::ContractAbi => "contract.abi",
			Self::ContractSource => "contract.source",
			Self::GasOracle => "gas.oracle",
			Self::EthPrice => "stats.eth_price",
			Self::EthSupply => "stats.eth_supply",
		}
	}

	/// Whether the method returns records scoped to a block interval and is
	/// therefore eligible for bulk harvesting
	pub fn is_range_scoped(&self) -> bool {
		matches!(
			self,
			Self::AccountTransactions
				| Self::AccountInternalTransactions
				| Self::AccountErc20Transfers
				| Self::EventLogs
		)
	}
}

impl fmt::Display for LogicalMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
