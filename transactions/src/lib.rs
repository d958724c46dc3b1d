//! Transactions of the DPoS core: data model, wire codec and verification.
//!
//! Eleven core types are built in, each in version 1 (legacy) and/or version 2
//! (nonce based) form:
//! - **Transfer**, **MultiPayment**: move balance
//! - **SecondSignature**, **MultiSignature**: register extra signing keys
//! - **DelegateRegistration**, **DelegateResignation**, **Vote**: delegate lifecycle
//! - **Ipfs**: anchor an IPFS multihash
//! - **HtlcLock**, **HtlcClaim**, **HtlcRefund**: hashed time-locked transfers
//!
//! The [`TypeRegistry`] maps `(typeGroup, type, version)` to a [`TransactionKind`]
//! that knows the asset layout and schema of that type. Custom type groups can be
//! registered at runtime; the core group is fixed.

pub mod builder;
pub mod bytes;
pub mod data;
pub mod deserializer;
pub mod error;
pub mod factory;
pub mod id;
pub mod kinds;
pub mod legacy;
pub mod registry;
pub mod schema;
pub mod serializer;
pub mod transaction;
pub mod types;
pub mod verifier;

pub use builder::TransactionBuilder;
pub use data::{
    Asset, DelegateAsset, HtlcClaimAsset, HtlcExpiration, HtlcExpirationType, HtlcLockAsset,
    HtlcRefundAsset, LegacyMultiSignatureAsset, MultiSignatureAsset, Payment,
    SecondSignatureAsset, TransactionData, Vote, VoteAction,
};
pub use error::{CodecError, TypeRegistryError};
pub use factory::TransactionFactory;
pub use kinds::TransactionKind;
pub use registry::TypeRegistry;
pub use serializer::SerializeOptions;
pub use transaction::Transaction;
pub use types::{CoreType, TypeGroup, TypeKey};
