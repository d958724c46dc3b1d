use crate::types::{CoreType, TypeKey};
use crate::TransactionData;
use dpos_types::{PublicKey, TransactionId};

/// A decoded transaction together with the exact bytes it was read from.
///
/// Built by [`crate::TransactionFactory`]; `data.id` is always set.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub data: TransactionData,
    pub serialized: Vec<u8>,
    /// Result of checking the primary signature when the transaction was built.
    pub is_verified: bool,
    /// Timestamp of the containing block, once decoded as part of one.
    pub block_timestamp: Option<u32>,
}

impl Transaction {
    pub fn type_key(&self) -> TypeKey {
        self.data.type_key()
    }

    pub fn core_type(&self) -> Option<CoreType> {
        self.data.core_type()
    }

    pub fn version(&self) -> u8 {
        self.data.version
    }

    pub fn sender_public_key(&self) -> &PublicKey {
        &self.data.sender_public_key
    }

    /// Multi-signature senders carry participant signatures instead of a primary one.
    pub fn has_multi_signatures(&self) -> bool {
        self.data.has_multi_signatures()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.serialized)
    }
}
