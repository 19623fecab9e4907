//! Built-in provider tables and their scanner factories.
//!
//! Each submodule declares one provider's endpoint table as data and exposes a
//! factory with the uniform [`crate::repositories::ScannerFactory`] signature.
//! New providers are added here and registered in the provider registry; the
//! dispatch interpreter never changes.

mod blockscout;
mod etherscan;
mod moralis;

pub use blockscout::blockscout_v1;
pub use etherscan::{etherscan_v1, etherscan_v2};
pub use moralis::moralis_v1;
