//! Blocks: header layout, full block codec, ids and verification.
//!
//! A serialized header is `version, timestamp, height, previousBlock,
//! numberOfTransactions, totalAmount, totalFee, reward, payloadLength,
//! payloadHash, generatorPublicKey` followed by the DER block signature. The
//! full form appends a table of transaction lengths and then the transaction
//! bodies, both in wire order.

pub mod block;
pub mod clock;
pub mod data;
pub mod deserializer;
pub mod error;
pub mod factory;
pub mod id;
pub mod serializer;
pub mod verifier;

pub use block::Block;
pub use clock::{Clock, SystemClock};
pub use data::{BlockData, BlockVerification};
pub use error::BlockError;
pub use factory::BlockFactory;
