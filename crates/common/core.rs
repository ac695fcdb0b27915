//! Introspection of raw EIP-1559 transactions: field breakdown, sender recovery
//! and the restricted destination check.
pub use bytes::Bytes;
pub use ethereum_types::{Address, H160, H256, U256};

pub mod config;
pub mod errors;
pub mod registry;
pub mod types;

pub use types::transaction::{decode_tx, decode_tx_with_config, DecodedTransaction};
