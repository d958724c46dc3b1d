//! Fundamental types for the transaction core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! arbitrary precision amounts, public keys, addresses, transaction and block ids,
//! and raw signature bytes.

pub mod address;
pub mod amount;
pub mod block;
pub mod error;
pub mod hash;
pub mod keys;

mod serde_hex;

pub use address::Address;
pub use amount::BigNumber;
pub use block::BlockId;
pub use error::TypesError;
pub use hash::{Bytes32, TransactionId};
pub use keys::{KeyPair, PrivateKey, PublicKey, SignatureBytes};
