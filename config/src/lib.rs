//! Network configuration for the transaction core.
//!
//! A network is described by one document with four sections:
//! - `network`: address byte, name, epoch
//! - `milestones`: height-indexed partial parameter sets, deep-merged in height order
//! - `exceptions`: historical patch tables (blocks, transactions, outlook table,
//!   transaction id fix table, negative balances)
//! - `genesisBlock`: the block at height 1
//!
//! [`ConfigManager`] is built once from that document and passed by reference to
//! the codec, the handlers and the block verifier.

pub mod error;
pub mod exceptions;
pub mod manager;
pub mod milestone;
pub mod network;
mod presets;

pub use error::ConfigError;
pub use exceptions::Exceptions;
pub use manager::ConfigManager;
pub use milestone::{BlockConstants, Fees, Milestone};
pub use network::{NetworkConfig, NetworkParams};
